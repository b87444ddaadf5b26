//! Types of IR values ([`Type`], [`TypeKind`]).
//!
//! Types are immutable and interned by a [`Context`]: two calls of
//! [`Type::get`] with the same kind on the same context return the same
//! shared instance.

use crate::context::Context;
use crate::error::ValueError;
use crate::ir::attrs::AttrValue;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::{fmt, ops};

/// Signedness semantics of integer types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signedness {
  /// The signedness is not fixed yet.
  Signless,
  /// Only non-negative values.
  Unsigned,
  /// Negative and non-negative values, the encoding is left to the target.
  Signed,
}

/// Kinds of floating-point types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatKind {
  /// 16-bit floating-point type.
  F16,
  /// 32-bit floating-point type.
  F32,
  /// 64-bit floating-point type.
  F64,
  /// 80-bit x87 extended precision type.
  F80,
  /// 128-bit floating-point type.
  F128,
  /// 16-bit brain floating-point type.
  BF16,
}

impl FloatKind {
  /// Returns the bit width of the floating-point kind.
  pub fn bitwidth(self) -> u32 {
    match self {
      FloatKind::F16 | FloatKind::BF16 => 16,
      FloatKind::F32 => 32,
      FloatKind::F64 => 64,
      FloatKind::F80 => 80,
      FloatKind::F128 => 128,
    }
  }

  /// Returns the name of the floating-point kind.
  pub fn name(self) -> &'static str {
    match self {
      FloatKind::F16 => "f16",
      FloatKind::F32 => "f32",
      FloatKind::F64 => "f64",
      FloatKind::F80 => "f80",
      FloatKind::F128 => "f128",
      FloatKind::BF16 => "bf16",
    }
  }
}

/// Kind of type, also the interning key of the type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
  /// Integer with bit width and signedness.
  Integer { bitwidth: u32, signedness: Signedness },
  /// Index type, used in loop bounds, indexing and dimensions.
  Index,
  /// Floating-point type.
  Float(FloatKind),
  /// The type of values that carry no numeric payload (strings).
  None,
}

impl TypeKind {
  /// Returns the shape of the values held by types of this kind.
  pub fn value_shape(&self) -> &'static str {
    match self {
      TypeKind::Integer { .. } | TypeKind::Index => "an integer",
      TypeKind::Float(..) => "a floating-point",
      TypeKind::None => "a string",
    }
  }

  /// Returns the tag of the kind.
  pub fn tag(&self) -> &'static str {
    match self {
      TypeKind::Integer { .. } => "integer",
      TypeKind::Index => "index",
      TypeKind::Float(..) => "float",
      TypeKind::None => "none",
    }
  }
}

impl fmt::Display for TypeKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      TypeKind::Integer {
        bitwidth,
        signedness,
      } => match signedness {
        Signedness::Signless => write!(f, "i{}", bitwidth),
        Signedness::Signed => write!(f, "si{}", bitwidth),
        Signedness::Unsigned => write!(f, "ui{}", bitwidth),
      },
      TypeKind::Index => f.write_str("index"),
      TypeKind::Float(kind) => f.write_str(kind.name()),
      TypeKind::None => f.write_str("none"),
    }
  }
}

/// Types in IR.
///
/// A cheap handle to an interned [`TypeKind`].
#[derive(Clone, Eq)]
pub struct Type(Rc<TypeKind>);

impl Type {
  /// Returns the canonical type of the given kind in the given context,
  /// creates and registers it if it does not exist.
  ///
  /// # Panics
  ///
  /// Panics if the given kind is an integer type with zero bit width.
  pub fn get(ctx: &mut Context, kind: TypeKind) -> Type {
    if let TypeKind::Integer { bitwidth, .. } = kind {
      assert!(bitwidth > 0, "bit width of integer type must be positive");
    }
    if let Some(ty) = ctx.get_type(&kind) {
      return ty;
    }
    let ty = Type(Rc::new(kind.clone()));
    ctx.types_mut().intern(kind, ty.clone());
    ty
  }

  /// Returns an integer type.
  ///
  /// # Panics
  ///
  /// Panics if `bitwidth` is zero.
  pub fn get_integer(ctx: &mut Context, bitwidth: u32, signedness: Signedness) -> Type {
    Self::get(
      ctx,
      TypeKind::Integer {
        bitwidth,
        signedness,
      },
    )
  }

  /// Returns a signless integer type.
  pub fn get_signless(ctx: &mut Context, bitwidth: u32) -> Type {
    Self::get_integer(ctx, bitwidth, Signedness::Signless)
  }

  /// Returns a signed integer type.
  pub fn get_signed(ctx: &mut Context, bitwidth: u32) -> Type {
    Self::get_integer(ctx, bitwidth, Signedness::Signed)
  }

  /// Returns an unsigned integer type.
  pub fn get_unsigned(ctx: &mut Context, bitwidth: u32) -> Type {
    Self::get_integer(ctx, bitwidth, Signedness::Unsigned)
  }

  /// Returns the index type.
  pub fn get_index(ctx: &mut Context) -> Type {
    Self::get(ctx, TypeKind::Index)
  }

  /// Returns a floating-point type.
  pub fn get_float(ctx: &mut Context, kind: FloatKind) -> Type {
    Self::get(ctx, TypeKind::Float(kind))
  }

  /// Returns the `none` type.
  pub fn get_none(ctx: &mut Context) -> Type {
    Self::get(ctx, TypeKind::None)
  }

  /// Returns a reference to the kind of the current type.
  pub fn kind(&self) -> &TypeKind {
    &self.0
  }

  /// Returns `true` if both types are the same interned instance.
  pub fn ptr_eq(&self, other: &Type) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }

  /// Returns the bit width of the type, `None` for `index` and `none`.
  pub fn bitwidth(&self) -> Option<u32> {
    match self.kind() {
      TypeKind::Integer { bitwidth, .. } => Some(*bitwidth),
      TypeKind::Float(kind) => Some(kind.bitwidth()),
      TypeKind::Index | TypeKind::None => None,
    }
  }

  /// Returns `true` if the type is an integer type.
  pub fn is_integer(&self) -> bool {
    matches!(self.kind(), TypeKind::Integer { .. })
  }

  /// Returns `true` if the type is the index type.
  pub fn is_index(&self) -> bool {
    matches!(self.kind(), TypeKind::Index)
  }

  /// Returns `true` if the type is a floating-point type.
  pub fn is_float(&self) -> bool {
    matches!(self.kind(), TypeKind::Float(..))
  }

  /// Returns a hash of the defining parameters of the type.
  pub fn structural_hash(&self) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    self.kind().hash(&mut hasher);
    hasher.finish()
  }

  /// Checks if the given value can be held by the current type.
  pub fn validate(&self, value: &AttrValue) -> Result<(), ValueError> {
    match (self.kind(), value) {
      (
        TypeKind::Integer {
          bitwidth,
          signedness,
        },
        AttrValue::Int(v),
      ) => {
        let (min, max) = integer_range(*bitwidth, *signedness);
        self.check_range(*v, min, max)
      }
      (TypeKind::Index, AttrValue::Int(v)) => self.check_range(*v, 0, i128::MAX as u128),
      (TypeKind::Float(..), AttrValue::Float(..)) => Ok(()),
      (TypeKind::None, AttrValue::Str(..)) => Ok(()),
      (kind, value) => Err(ValueError::KindMismatch {
        ty: self.to_string(),
        expected: kind.value_shape(),
        found: value.shape(),
      }),
    }
  }

  fn check_range(&self, value: i128, min: i128, max: u128) -> Result<(), ValueError> {
    let in_range = if value < 0 {
      value >= min
    } else {
      value as u128 <= max
    };
    if in_range {
      Ok(())
    } else {
      Err(ValueError::OutOfRange {
        ty: self.to_string(),
        value,
        min,
        max,
      })
    }
  }
}

/// Returns the inclusive range of an integer type.
///
/// Signless integers accept the union of the signed and unsigned ranges,
/// since the sign is not fixed yet.
fn integer_range(bitwidth: u32, signedness: Signedness) -> (i128, u128) {
  let min = match signedness {
    Signedness::Unsigned => 0,
    _ if bitwidth >= 128 => i128::MIN,
    _ => -(1i128 << (bitwidth - 1)),
  };
  let max = match signedness {
    Signedness::Signed if bitwidth >= 128 => i128::MAX as u128,
    Signedness::Signed => (1u128 << (bitwidth - 1)) - 1,
    _ if bitwidth >= 128 => u128::MAX,
    _ => (1u128 << bitwidth) - 1,
  };
  (min, max)
}

impl PartialEq for Type {
  fn eq(&self, other: &Self) -> bool {
    self.ptr_eq(other) || self.0 == other.0
  }
}

impl Hash for Type {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.0.hash(state)
  }
}

impl ops::Deref for Type {
  type Target = TypeKind;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Display::fmt(self.kind(), f)
  }
}

impl fmt::Debug for Type {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self)
  }
}
