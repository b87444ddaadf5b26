//! Attributes ([`Attribute`]), the typed constants attached to
//! operations by name.

use crate::context::Context;
use crate::error::ValueError;
use crate::ir::types::{Type, TypeKind};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Map of named attributes of an operation.
pub type AttrMap = BTreeMap<String, Attribute>;

/// Payload of an attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
  /// Integer payload, for integer and index types.
  Int(i128),
  /// IEEE floating-point payload.
  Float(f64),
  /// String payload, for the `none` type.
  Str(String),
}

impl AttrValue {
  /// Returns a short description of the runtime shape of the value.
  pub fn shape(&self) -> &'static str {
    match self {
      AttrValue::Int(..) => "an integer",
      AttrValue::Float(..) => "a floating-point",
      AttrValue::Str(..) => "a string",
    }
  }

  /// Returns the hashable key of the value.
  pub fn key(&self) -> ValueKey {
    match self {
      AttrValue::Int(v) => ValueKey::Int(*v),
      AttrValue::Float(v) => ValueKey::Float(v.to_bits()),
      AttrValue::Str(s) => ValueKey::Str(s.clone()),
    }
  }
}

impl fmt::Display for AttrValue {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      AttrValue::Int(v) => write!(f, "{}", v),
      AttrValue::Float(v) => write!(f, "{:?}", v),
      AttrValue::Str(s) => write!(f, "{:?}", s),
    }
  }
}

/// Hashable form of [`AttrValue`], floats are keyed by their bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
  Int(i128),
  Float(u64),
  Str(String),
}

/// Interning key of attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeKey {
  pub ty: TypeKind,
  pub value: ValueKey,
}

impl fmt::Display for AttributeKey {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?} : {}", self.value, self.ty)
  }
}

/// Data of attribute.
#[derive(Debug, PartialEq)]
pub struct AttributeData {
  ty: Type,
  value: AttrValue,
}

/// Attributes in IR.
///
/// An attribute is an immutable pair of a type and a value that fits in
/// that type. Attributes are interned by a [`Context`].
#[derive(Clone)]
pub struct Attribute(Rc<AttributeData>);

impl Attribute {
  /// Returns the canonical attribute of the given type and value,
  /// creates and registers it if it does not exist.
  ///
  /// Returns an error if the value does not fit in the type.
  pub fn get(ctx: &mut Context, ty: Type, value: AttrValue) -> Result<Attribute, ValueError> {
    ty.validate(&value)?;
    let key = AttributeKey {
      ty: ty.kind().clone(),
      value: value.key(),
    };
    if let Some(attr) = ctx.get_attribute(&key) {
      return Ok(attr);
    }
    let attr = Attribute(Rc::new(AttributeData { ty, value }));
    ctx.attributes_mut().intern(key, attr.clone());
    Ok(attr)
  }

  /// Creates an integer attribute.
  ///
  /// Returns an error if `ty` is not an integer type, or `value`
  /// is out of its range.
  pub fn integer(ctx: &mut Context, ty: Type, value: i128) -> Result<Attribute, ValueError> {
    let value = AttrValue::Int(value);
    Self::expect_kind(&ty, Type::is_integer, &value)?;
    Self::get(ctx, ty, value)
  }

  /// Creates an index attribute.
  ///
  /// Returns an error if `value` is negative.
  pub fn index(ctx: &mut Context, value: i128) -> Result<Attribute, ValueError> {
    let ty = Type::get_index(ctx);
    Self::get(ctx, ty, AttrValue::Int(value))
  }

  /// Creates a floating-point attribute.
  ///
  /// Returns an error if `ty` is not a floating-point type.
  pub fn float(ctx: &mut Context, ty: Type, value: f64) -> Result<Attribute, ValueError> {
    let value = AttrValue::Float(value);
    Self::expect_kind(&ty, Type::is_float, &value)?;
    Self::get(ctx, ty, value)
  }

  /// Creates a string attribute of type `none`.
  pub fn string(ctx: &mut Context, value: &str) -> Attribute {
    let ty = Type::get_none(ctx);
    let key = AttributeKey {
      ty: TypeKind::None,
      value: ValueKey::Str(value.into()),
    };
    if let Some(attr) = ctx.get_attribute(&key) {
      return attr;
    }
    let attr = Attribute(Rc::new(AttributeData {
      ty,
      value: AttrValue::Str(value.into()),
    }));
    ctx.attributes_mut().intern(key, attr.clone());
    attr
  }

  fn expect_kind(
    ty: &Type,
    pred: fn(&Type) -> bool,
    value: &AttrValue,
  ) -> Result<(), ValueError> {
    if pred(ty) {
      Ok(())
    } else {
      Err(ValueError::KindMismatch {
        ty: ty.to_string(),
        expected: ty.kind().value_shape(),
        found: value.shape(),
      })
    }
  }

  /// Returns a reference to the type of the attribute.
  pub fn ty(&self) -> &Type {
    &self.0.ty
  }

  /// Returns a reference to the value of the attribute.
  pub fn value(&self) -> &AttrValue {
    &self.0.value
  }

  /// Returns the integer payload, if any.
  pub fn as_int(&self) -> Option<i128> {
    match self.value() {
      AttrValue::Int(v) => Some(*v),
      _ => None,
    }
  }

  /// Returns the floating-point payload, if any.
  pub fn as_float(&self) -> Option<f64> {
    match self.value() {
      AttrValue::Float(v) => Some(*v),
      _ => None,
    }
  }

  /// Returns the string payload, if any.
  pub fn as_str(&self) -> Option<&str> {
    match self.value() {
      AttrValue::Str(s) => Some(s),
      _ => None,
    }
  }

  /// Returns `true` if both attributes are the same interned instance.
  pub fn ptr_eq(&self, other: &Attribute) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl PartialEq for Attribute {
  fn eq(&self, other: &Self) -> bool {
    self.ptr_eq(other) || self.0 == other.0
  }
}

impl fmt::Display for Attribute {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{} : {}", self.value(), self.ty())
  }
}

impl fmt::Debug for Attribute {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self)
  }
}
