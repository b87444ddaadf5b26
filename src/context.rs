//! Compilation context ([`Context`]), the interning tables of types
//! and attributes.

use crate::error::DuplicateKeyError;
use crate::ir::attrs::{Attribute, AttributeKey};
use crate::ir::types::{Type, TypeKind};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Compilation context.
///
/// `Context` owns one [`TypeStorage`] and one [`AttributeStorage`], and
/// guarantees that there is only one canonical instance for each
/// structurally distinct type or attribute.
#[derive(Default)]
pub struct Context {
  types: TypeStorage,
  attributes: AttributeStorage,
}

impl Context {
  /// Creates a new empty context.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the type interned under the given key, if any.
  pub fn get_type(&self, key: &TypeKind) -> Option<Type> {
    self.types.get(key)
  }

  /// Adds a new type under the given key.
  ///
  /// Fails if the key is already present, no matter if the existing
  /// type equals to the given one.
  pub fn add_type(&mut self, key: TypeKind, ty: Type) -> Result<(), DuplicateKeyError> {
    self.types.add(key, ty)
  }

  /// Returns the attribute interned under the given key, if any.
  pub fn get_attribute(&self, key: &AttributeKey) -> Option<Attribute> {
    self.attributes.get(key)
  }

  /// Adds a new attribute under the given key.
  ///
  /// Fails if the key is already present, no matter if the existing
  /// attribute equals to the given one.
  pub fn add_attribute(
    &mut self,
    key: AttributeKey,
    attr: Attribute,
  ) -> Result<(), DuplicateKeyError> {
    self.attributes.add(key, attr)
  }

  /// Returns a reference to the type table.
  pub fn types(&self) -> &TypeStorage {
    &self.types
  }

  /// Returns a mutable reference to the type table.
  pub fn types_mut(&mut self) -> &mut TypeStorage {
    &mut self.types
  }

  /// Returns a reference to the attribute table.
  pub fn attributes(&self) -> &AttributeStorage {
    &self.attributes
  }

  /// Returns a mutable reference to the attribute table.
  pub fn attributes_mut(&mut self) -> &mut AttributeStorage {
    &mut self.attributes
  }
}

/// An insert-once interning table.
pub struct Storage<K, V> {
  table: &'static str,
  map: HashMap<K, V>,
}

/// Interning table of types.
pub type TypeStorage = Storage<TypeKind, Type>;

/// Interning table of attributes.
pub type AttributeStorage = Storage<AttributeKey, Attribute>;

impl Default for TypeStorage {
  fn default() -> Self {
    Self::new("type")
  }
}

impl Default for AttributeStorage {
  fn default() -> Self {
    Self::new("attribute")
  }
}

impl<K, V> Storage<K, V>
where
  K: Hash + Eq + Display,
  V: Clone + PartialEq,
{
  fn new(table: &'static str) -> Self {
    Self {
      table,
      map: HashMap::new(),
    }
  }

  /// Returns the value under the given key, if any.
  pub fn get(&self, key: &K) -> Option<V> {
    self.map.get(key).cloned()
  }

  /// Adds a new entry.
  ///
  /// Re-inserting an existing key is always an error, the error tells
  /// whether the values are the same.
  pub fn add(&mut self, key: K, value: V) -> Result<(), DuplicateKeyError> {
    match self.map.get(&key) {
      Some(old) if *old == value => Err(DuplicateKeyError::SameValue {
        table: self.table,
        key: key.to_string(),
      }),
      Some(_) => Err(DuplicateKeyError::DifferentValue {
        table: self.table,
        key: key.to_string(),
      }),
      None => {
        self.map.insert(key, value);
        Ok(())
      }
    }
  }

  /// Inserts a value that was just looked up and missed.
  ///
  /// # Panics
  ///
  /// Panics if the key is already present.
  pub(crate) fn intern(&mut self, key: K, value: V) {
    let prev = self.map.insert(key, value);
    assert!(prev.is_none(), "interned key already exists");
  }

  /// Returns the number of entries.
  pub fn len(&self) -> usize {
    self.map.len()
  }

  /// Returns `true` if the table is empty.
  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }

  /// Returns `true` if the table contains the given key.
  pub fn contains_key(&self, key: &K) -> bool {
    self.map.contains_key(key)
  }
}
