//! Layout of operations in blocks ([`OpList`]) and blocks in regions
//! ([`BlockList`]).

use crate::ir::entities::{Block, Operation};
use key_node_list::{impl_node, KeyNodeList};

/// Operation list, stores the order of all operations in a block.
///
/// Operation list is a [`KeyNodeList`], with the key is [`Operation`],
/// and the node is [`OpNode`]. Operations carry no index, their
/// position is only known by walking the list.
pub type OpList = KeyNodeList<Operation, OpNode>;

/// The node in [`OpList`].
pub struct OpNode {
  prev: Option<Operation>,
  next: Option<Operation>,
}

impl_node!(OpNode { Key = Operation, prev = prev, next = next });

impl From<()> for OpNode {
  fn from(_: ()) -> Self {
    Self {
      prev: None,
      next: None,
    }
  }
}

/// Block list, stores the order of all blocks in a region.
///
/// Block list is a [`KeyNodeList`], with the key is [`Block`],
/// and the node is [`BlockNode`].
pub type BlockList = KeyNodeList<Block, BlockNode>;

/// The node in [`BlockList`].
pub struct BlockNode {
  prev: Option<Block>,
  next: Option<Block>,
}

impl_node!(BlockNode { Key = Block, prev = prev, next = next });

impl From<()> for BlockNode {
  fn from(_: ()) -> Self {
    Self {
      prev: None,
      next: None,
    }
  }
}

/// Positional operations on layout lists.
pub(in crate::ir) trait Positional<K> {
  /// Inserts the key at the given position, `index` must be in
  /// `0..=len` and the key must not be in the list.
  fn insert_at(&mut self, index: usize, key: K);

  /// Pushes the key to the back of the list.
  fn push_back_key(&mut self, key: K);
}

macro_rules! impl_positional {
  ($list:ty, $key:ty) => {
    impl Positional<$key> for $list {
      fn insert_at(&mut self, index: usize, key: $key) {
        match self.keys().nth(index).copied() {
          Some(anchor) => assert!(
            self.cursor_mut(anchor).insert_key_before(key).is_ok(),
            "key is already in the list"
          ),
          None => self.push_back_key(key),
        }
      }

      fn push_back_key(&mut self, key: $key) {
        assert!(self.push_key_back(key).is_ok(), "key is already in the list");
      }
    }
  };
}

impl_positional!(OpList, Operation);
impl_positional!(BlockList, Block);

#[cfg(test)]
mod test {
  use super::*;
  use std::collections::HashMap;

  fn keys(list: &OpList) -> Vec<Operation> {
    list.keys().copied().collect()
  }

  #[test]
  fn insert_at_positions() {
    let mut list = OpList::with_map(HashMap::new());
    list.push_back_key(Operation(1));
    list.push_back_key(Operation(3));
    list.insert_at(1, Operation(2));
    list.insert_at(0, Operation(0));
    list.insert_at(4, Operation(4));
    assert_eq!(keys(&list), [0, 1, 2, 3, 4].map(Operation).to_vec());
    assert_eq!(list.front_key(), Some(&Operation(0)));
    assert_eq!(list.back_key(), Some(&Operation(4)));
  }

  #[test]
  #[should_panic]
  fn insert_twice() {
    let mut list = BlockList::with_map(HashMap::new());
    list.push_back_key(Block(1));
    list.push_back_key(Block(2));
    list.insert_at(0, Block(2));
  }
}
