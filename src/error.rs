//! Error types reported by the IR core.
//!
//! Every failure is a synchronous, caller-visible contract violation.
//! Nothing here is retried or suppressed inside the crate.

use crate::ir::entities::{Block, Operation, Region, Value};
use derive_more::{Display, Error, From};

pub use crate::validator::{RuleFailure, ValidationError};

/// Result type with the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Any error produced by the IR core.
#[derive(Debug, Display, Error, From, Clone, PartialEq)]
pub enum Error {
  #[display("{_0}")]
  DuplicateKey(DuplicateKeyError),
  #[display("{_0}")]
  Value(ValueError),
  #[display("{_0}")]
  Validation(ValidationError),
  #[display("{_0}")]
  Edit(EditError),
  #[display("{_0}")]
  Symbol(SymbolError),
}

impl From<OwnershipError> for Error {
  fn from(error: OwnershipError) -> Self {
    Error::Edit(error.into())
  }
}

impl From<IndexError> for Error {
  fn from(error: IndexError) -> Self {
    Error::Edit(error.into())
  }
}

/// Inserting a key that is already present in a [`Context`](crate::Context)
/// interning table.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum DuplicateKeyError {
  /// The table already holds an equal value under this key.
  #[display("{table} `{key}` already exists in the context with the same value")]
  SameValue { table: &'static str, key: String },
  /// The table holds a different value under this key.
  #[display("{table} key `{key}` already exists in the context with a different value")]
  DifferentValue { table: &'static str, key: String },
}

/// A candidate value does not fit its declared type.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
  /// The runtime shape of the value is wrong for the type.
  #[display("type `{ty}` expects {expected} value, but got {found} value")]
  KindMismatch {
    ty: String,
    expected: &'static str,
    found: &'static str,
  },
  /// The value is outside the numeric range of the type.
  #[display("value {value} is out of range [{min}, {max}] for type `{ty}`")]
  OutOfRange {
    ty: String,
    value: i128,
    min: i128,
    max: u128,
  },
}

/// A container edit on an entity that is owned by the wrong container.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum OwnershipError {
  #[display("block argument {arg} does not belong to block {block}")]
  ArgumentNotOwned { arg: Value, block: Block },
  #[display("operation {op} does not belong to block {block}")]
  OpNotOwned { op: Operation, block: Block },
  #[display("operation {op} already belongs to block {parent}")]
  OpAlreadyOwned { op: Operation, parent: Block },
  #[display("block {block} does not belong to region {region}")]
  BlockNotOwned { block: Block, region: Region },
  #[display("block {block} is already owned by region {owner}")]
  BlockAlreadyOwned { block: Block, owner: Region },
  #[display("operation {op} can not be nested inside block {block} of its own regions")]
  OpCycle { op: Operation, block: Block },
  #[display("block {block} can not be nested inside region {region} of its own operations")]
  BlockCycle { block: Block, region: Region },
}

/// A positional index outside the bounds of a container.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display("index {index} is out of range for {what} of length {len}")]
pub struct IndexError {
  pub what: &'static str,
  pub index: usize,
  pub len: usize,
}

/// Failure of a block, region or operation edit.
#[derive(Debug, Display, Error, From, Clone, PartialEq, Eq)]
pub enum EditError {
  #[display("{_0}")]
  Ownership(OwnershipError),
  #[display("{_0}")]
  Index(IndexError),
  /// Erasing would leave uses of a destroyed value behind.
  #[display("value {value} is still used by operation {user}")]
  #[from(ignore)]
  InUse { value: Value, user: Operation },
  /// Erasing would leave a successor naming a destroyed block.
  #[display("block {block} is still a successor of operation {user}")]
  #[from(ignore)]
  BlockInUse { block: Block, user: Operation },
}

/// Failure of a symbol table update.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
  #[display("operation {_0} does not carry a symbol table")]
  NoSymbolTable(#[error(not(source))] Operation),
  #[display("operation {_0} does not define a symbol")]
  NotASymbol(#[error(not(source))] Operation),
  #[display("symbol `{name}` is already defined by operation {existing}")]
  Duplicate { name: String, existing: Operation },
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn duplicate_key_messages() {
    let same = DuplicateKeyError::SameValue {
      table: "type",
      key: "i32".into(),
    };
    let diff = DuplicateKeyError::DifferentValue {
      table: "type",
      key: "i32".into(),
    };
    assert!(same.to_string().contains("already exists"));
    assert!(same.to_string().contains("same value"));
    assert!(diff.to_string().contains("different value"));
  }

  #[test]
  fn edit_errors_convert() {
    let err: Error = IndexError {
      what: "block arguments",
      index: 3,
      len: 1,
    }
    .into();
    assert!(matches!(err, Error::Edit(EditError::Index(..))));
    assert_eq!(
      err.to_string(),
      "index 3 is out of range for block arguments of length 1"
    );
  }
}
