//! Block related methods of [`DataFlowGraph`].
//!
//! Block arguments are numbered densely from zero after every edit.
//! Operations carry no index, only their position in the operation list.

use crate::error::{EditError, IndexError, OwnershipError};
use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::{Block, BlockData, Operation, Value, ValueData, ValueKind};
use crate::ir::idman::{next_block_id, next_value_id};
use crate::ir::layout::Positional;
use crate::ir::types::Type;

impl DataFlowGraph {
  /// Creates a new empty block. Returns the handle of the created block.
  pub fn new_block(&mut self) -> Block {
    let block = Block(next_block_id());
    self.blocks.insert(block, BlockData::new());
    block
  }

  /// Creates a new block with arguments of the given types.
  pub fn new_block_with_args<I: IntoIterator<Item = Type>>(&mut self, types: I) -> Block {
    let block = self.new_block();
    for ty in types {
      self.add_argument(block, ty);
    }
    block
  }

  /// Inserts a new argument of type `ty` at position `index`, and
  /// renumbers the following arguments. Returns the new argument.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn insert_argument(
    &mut self,
    block: Block,
    index: usize,
    ty: Type,
  ) -> Result<Value, IndexError> {
    let len = self.block(block).args.len();
    if index > len {
      return Err(IndexError {
        what: "block arguments",
        index,
        len,
      });
    }
    let arg = Value(next_value_id());
    let kind = ValueKind::BlockArgument {
      owner: Some(block),
      index: Some(index),
    };
    self.values.insert(arg, ValueData::new(ty, kind));
    self.block_mut(block).args.insert(index, arg);
    self.renumber_args(block, index + 1);
    Ok(arg)
  }

  /// Appends a new argument of type `ty`. Returns the new argument.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn add_argument(&mut self, block: Block, ty: Type) -> Value {
    let arg = Value(next_value_id());
    let index = self.block(block).args.len();
    let kind = ValueKind::BlockArgument {
      owner: Some(block),
      index: Some(index),
    };
    self.values.insert(arg, ValueData::new(ty, kind));
    self.block_mut(block).args.push(arg);
    arg
  }

  /// Removes the given argument from the block, and renumbers the
  /// remaining arguments.
  ///
  /// The removed argument stays in the graph, with no owner and no index.
  ///
  /// # Panics
  ///
  /// Panics if the given block or argument does not exist.
  pub fn remove_argument(&mut self, block: Block, arg: Value) -> Result<(), OwnershipError> {
    let index = match *self.value(arg).kind() {
      ValueKind::BlockArgument {
        owner: Some(owner),
        index: Some(index),
      } if owner == block => index,
      _ => return Err(OwnershipError::ArgumentNotOwned { arg, block }),
    };
    self.block_mut(block).args.remove(index);
    *self.value_mut(arg).kind_mut() = ValueKind::BlockArgument {
      owner: None,
      index: None,
    };
    self.renumber_args(block, index);
    Ok(())
  }

  /// Removes the argument at position `index`. Returns the removed
  /// argument.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn remove_argument_at(&mut self, block: Block, index: usize) -> Result<Value, EditError> {
    let data = self.block(block);
    let arg = data.argument(index).ok_or(IndexError {
      what: "block arguments",
      index,
      len: data.num_arguments(),
    })?;
    self.remove_argument(block, arg)?;
    Ok(arg)
  }

  fn renumber_args(&mut self, block: Block, from: usize) {
    let args = self.block(block).args[from..].to_vec();
    for (offset, arg) in args.into_iter().enumerate() {
      *self.value_mut(arg).kind_mut() = ValueKind::BlockArgument {
        owner: Some(block),
        index: Some(from + offset),
      };
    }
  }

  /// Inserts the given operation at position `index` of the block.
  ///
  /// Fails if the operation is already in a block (including this one),
  /// if `index` is out of range, or if the block is nested inside the
  /// regions of the operation.
  ///
  /// # Panics
  ///
  /// Panics if the given block or operation does not exist.
  pub fn insert_op(&mut self, block: Block, index: usize, op: Operation) -> Result<(), EditError> {
    if let Some(parent) = self.op(op).parent {
      return Err(EditError::Ownership(OwnershipError::OpAlreadyOwned { op, parent }));
    }
    self.check_op_insertion(block, index, op)?;
    self.attach_op(block, Some(index), op);
    Ok(())
  }

  /// Inserts the given operation at the front of the block.
  ///
  /// # Panics
  ///
  /// Panics if the given block or operation does not exist.
  pub fn push_op_front(&mut self, block: Block, op: Operation) -> Result<(), EditError> {
    self.insert_op(block, 0, op)
  }

  /// Appends the given operation to the end of the block.
  ///
  /// # Panics
  ///
  /// Panics if the given block or operation does not exist.
  pub fn push_op_back(&mut self, block: Block, op: Operation) -> Result<(), EditError> {
    let len = self.block(block).num_ops();
    self.insert_op(block, len, op)
  }

  /// Removes the given operation from the block. The operation stays in
  /// the graph with no parent.
  ///
  /// # Panics
  ///
  /// Panics if the given block or operation does not exist.
  pub fn remove_op(&mut self, block: Block, op: Operation) -> Result<(), OwnershipError> {
    if self.op(op).parent != Some(block) {
      return Err(OwnershipError::OpNotOwned { op, block });
    }
    self.detach_op(block, op);
    Ok(())
  }

  /// Moves the given operation from `block` to position `index` of
  /// `target`.
  ///
  /// Everything is checked before anything is changed: on failure both
  /// blocks are left unchanged. If `target` is `block`, `index` is the
  /// position after the removal.
  ///
  /// # Panics
  ///
  /// Panics if any of the given blocks or the operation does not exist.
  pub fn splice_op(
    &mut self,
    block: Block,
    op: Operation,
    target: Block,
    index: usize,
  ) -> Result<(), EditError> {
    if self.op(op).parent != Some(block) {
      return Err(EditError::Ownership(OwnershipError::OpNotOwned { op, block }));
    }
    self.check_op_insertion(target, index, op)?;
    self.detach_op(block, op);
    self.attach_op(target, Some(index), op);
    Ok(())
  }

  /// Checks if `op` can be inserted at `index` of `block`, assuming it
  /// has already been detached from its current block.
  fn check_op_insertion(&self, block: Block, index: usize, op: Operation) -> Result<(), EditError> {
    let data = self.block(block);
    let mut len = data.num_ops();
    if self.op(op).parent == Some(block) {
      len -= 1;
    }
    if index > len {
      return Err(
        IndexError {
          what: "block operations",
          index,
          len,
        }
        .into(),
      );
    }
    if self.is_block_inside(block, self.op(op).regions()) {
      return Err(EditError::Ownership(OwnershipError::OpCycle { op, block }));
    }
    Ok(())
  }

  /// Links the operation into the block, `None` means the end.
  pub(in crate::ir) fn attach_op(&mut self, block: Block, index: Option<usize>, op: Operation) {
    let ops = &mut self.block_mut(block).ops;
    match index {
      Some(index) => ops.insert_at(index, op),
      None => ops.push_back_key(op),
    }
    self.op_mut(op).parent = Some(block);
  }

  /// Unlinks the operation from the block.
  pub(in crate::ir) fn detach_op(&mut self, block: Block, op: Operation) {
    self.block_mut(block).ops.remove(&op);
    self.op_mut(op).parent = None;
  }

  /// Returns the first operation of the block.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn front(&self, block: Block) -> Option<Operation> {
    self.block(block).front()
  }

  /// Returns the last operation of the block.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn back(&self, block: Block) -> Option<Operation> {
    self.block(block).back()
  }

  /// Returns the last operation of the block if it is a terminator.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn terminator(&self, block: Block) -> Option<Operation> {
    self.back(block).filter(|op| self.op(*op).is_terminator())
  }

  /// Returns the successors of the block, named by its terminator.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn successors(&self, block: Block) -> &[Block] {
    match self.terminator(block) {
      Some(op) => self.op(op).successors(),
      None => &[],
    }
  }

  /// Returns the operation that owns the region of the block.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn parent_op(&self, block: Block) -> Option<Operation> {
    self.region(self.block(block).owner?).parent
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::context::Context;
  use crate::ir::builder::OperationState;
  use crate::ir::traits::OpTrait;

  fn indices(dfg: &DataFlowGraph, block: Block) -> Vec<Option<usize>> {
    dfg
      .block(block)
      .arguments()
      .iter()
      .map(|a| dfg.value(*a).index())
      .collect()
  }

  fn ops(dfg: &DataFlowGraph, block: Block) -> Vec<Operation> {
    dfg.block(block).ops().keys().copied().collect()
  }

  fn op(dfg: &mut DataFlowGraph, name: &str) -> Operation {
    dfg.create_operation(OperationState::new(name)).unwrap()
  }

  #[test]
  fn argument_indices_stay_dense() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let i32_ty = Type::get_signless(&mut ctx, 32);
    let f32_ty = Type::get_float(&mut ctx, crate::ir::types::FloatKind::F32);
    let block = dfg.new_block_with_args([i32_ty.clone(), i32_ty.clone()]);
    let first = dfg.insert_argument(block, 0, f32_ty.clone()).unwrap();
    let last = dfg.add_argument(block, f32_ty);
    assert_eq!(indices(&dfg, block), [0, 1, 2, 3].map(Some).to_vec());
    assert_eq!(dfg.block(block).argument(0), Some(first));
    assert_eq!(dfg.value(first).owner_block(), Some(block));

    dfg.remove_argument(block, first).unwrap();
    assert_eq!(indices(&dfg, block), [0, 1, 2].map(Some).to_vec());
    assert_eq!(
      *dfg.value(first).kind(),
      ValueKind::BlockArgument {
        owner: None,
        index: None
      }
    );
    let middle = dfg.remove_argument_at(block, 1).unwrap();
    assert_eq!(indices(&dfg, block), [0, 1].map(Some).to_vec());
    assert_eq!(dfg.block(block).argument(1), Some(last));
    assert_eq!(dfg.value(middle).index(), None);

    assert!(matches!(
      dfg.insert_argument(block, 5, i32_ty),
      Err(IndexError { index: 5, len: 2, .. })
    ));
    assert!(matches!(
      dfg.remove_argument_at(block, 2),
      Err(EditError::Index(..))
    ));
  }

  #[test]
  fn remove_foreign_argument() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let ty = Type::get_index(&mut ctx);
    let a = dfg.new_block_with_args([ty.clone()]);
    let b = dfg.new_block_with_args([ty]);
    let arg = dfg.block(a).arguments()[0];
    assert_eq!(
      dfg.remove_argument(b, arg),
      Err(OwnershipError::ArgumentNotOwned { arg, block: b })
    );
    dfg.remove_argument(a, arg).unwrap();
    assert!(dfg.remove_argument(a, arg).is_err());
  }

  #[test]
  fn insert_and_remove_ops() {
    let mut dfg = DataFlowGraph::new();
    let block = dfg.new_block();
    let (a, b, c) = (op(&mut dfg, "a"), op(&mut dfg, "b"), op(&mut dfg, "c"));
    dfg.push_op_back(block, b).unwrap();
    dfg.push_op_front(block, a).unwrap();
    dfg.insert_op(block, 2, c).unwrap();
    assert_eq!(ops(&dfg, block), vec![a, b, c]);
    assert_eq!(dfg.op(b).parent(), Some(block));
    assert_eq!(dfg.front(block), Some(a));
    assert_eq!(dfg.back(block), Some(c));
    assert_eq!(dfg.block(block).op_at(1), Some(b));

    // already in a block, even the same one
    assert_eq!(
      dfg.push_op_back(block, a),
      Err(EditError::Ownership(OwnershipError::OpAlreadyOwned { op: a, parent: block }))
    );
    let other = dfg.new_block();
    assert!(dfg.push_op_back(other, a).is_err());

    dfg.remove_op(block, b).unwrap();
    assert_eq!(ops(&dfg, block), vec![a, c]);
    assert_eq!(dfg.op(b).parent(), None);
    assert_eq!(
      dfg.remove_op(block, b),
      Err(OwnershipError::OpNotOwned { op: b, block })
    );
    assert!(matches!(
      dfg.insert_op(block, 3, b),
      Err(EditError::Index(..))
    ));
    assert_eq!(dfg.op(b).parent(), None);
  }

  #[test]
  fn splice_is_atomic() {
    let mut dfg = DataFlowGraph::new();
    let a = dfg.new_block();
    let b = dfg.new_block();
    let (x, y, z) = (op(&mut dfg, "x"), op(&mut dfg, "y"), op(&mut dfg, "z"));
    dfg.push_op_back(a, x).unwrap();
    dfg.push_op_back(a, y).unwrap();
    dfg.push_op_back(b, z).unwrap();

    dfg.splice_op(a, x, b, 0).unwrap();
    assert_eq!(ops(&dfg, a), vec![y]);
    assert_eq!(ops(&dfg, b), vec![x, z]);
    assert_eq!(dfg.op(x).parent(), Some(b));

    // `x` is no longer in `a`
    assert_eq!(
      dfg.splice_op(a, x, b, 1),
      Err(EditError::Ownership(OwnershipError::OpNotOwned { op: x, block: a }))
    );
    // out of range in the target
    assert!(dfg.splice_op(a, y, b, 3).is_err());
    assert_eq!(ops(&dfg, a), vec![y]);
    assert_eq!(ops(&dfg, b), vec![x, z]);

    // splice within one block
    dfg.splice_op(b, x, b, 1).unwrap();
    assert_eq!(ops(&dfg, b), vec![z, x]);
  }

  #[test]
  fn op_can_not_enter_own_region() {
    let mut dfg = DataFlowGraph::new();
    let inner = dfg.new_block();
    let region = dfg.new_region_with_blocks([inner]).unwrap();
    let outer = dfg
      .create_operation(OperationState::new("outer").region(region))
      .unwrap();
    assert_eq!(
      dfg.push_op_back(inner, outer),
      Err(EditError::Ownership(OwnershipError::OpCycle { op: outer, block: inner }))
    );
    let nested = dfg.new_block();
    let nested_region = dfg.new_region_with_blocks([nested]).unwrap();
    let mid = dfg
      .create_operation(OperationState::new("mid").region(nested_region))
      .unwrap();
    dfg.push_op_back(inner, mid).unwrap();
    assert!(dfg.push_op_back(nested, outer).is_err());
    assert_eq!(dfg.parent_op(nested), Some(mid));
    assert_eq!(dfg.parent_op(inner), Some(outer));
  }

  #[test]
  fn terminator_and_successors() {
    let mut dfg = DataFlowGraph::new();
    let block = dfg.new_block();
    let exit = dfg.new_block();
    assert_eq!(dfg.terminator(block), None);
    assert!(dfg.successors(block).is_empty());
    let br = dfg
      .create_operation(
        OperationState::new("br")
          .traits([OpTrait::Terminator])
          .successor(exit)
          .parent(block),
      )
      .unwrap();
    assert_eq!(dfg.terminator(block), Some(br));
    assert_eq!(dfg.successors(block), &[exit]);
    let other = op(&mut dfg, "other");
    dfg.push_op_back(block, other).unwrap();
    assert_eq!(dfg.terminator(block), None);
    assert!(dfg.successors(block).is_empty());
    assert_eq!(dfg.parent_op(block), None);
  }
}
