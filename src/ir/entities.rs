//! IR entities, including operations ([`Operation`], [`OperationData`]),
//! blocks ([`Block`], [`BlockData`]), regions ([`Region`], [`RegionData`])
//! and values ([`Value`], [`ValueData`]).
//!
//! All entities are stored in a [`DataFlowGraph`](crate::ir::DataFlowGraph)
//! and referenced by copyable handles. Back-links between entities are
//! handles too, and are only updated by the graph.

use crate::ir::attrs::{AttrMap, Attribute};
use crate::ir::builder::OpVerifier;
use crate::ir::idman::{BlockId, OperationId, RegionId, ValueId};
use crate::ir::layout::{BlockList, OpList};
use crate::ir::traits::{OpTrait, SymbolTable};
use crate::ir::types::Type;
use derive_more::Display;
use std::collections::HashMap;

/// Handle of an operation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, PartialOrd, Ord)]
#[display("op{_0}")]
pub struct Operation(pub(in crate::ir) OperationId);

/// Handle of a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, PartialOrd, Ord)]
#[display("^bb{_0}")]
pub struct Block(pub(in crate::ir) BlockId);

/// Handle of a region.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, PartialOrd, Ord)]
#[display("region{_0}")]
pub struct Region(pub(in crate::ir) RegionId);

/// Handle of a value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, PartialOrd, Ord)]
#[display("%{_0}")]
pub struct Value(pub(in crate::ir) ValueId);

/// An operand edge, the `index`-th operand of operation `owner`.
///
/// The value the edge refers to is stored in the operand list of `owner`,
/// and the edge itself is stored in the use list of that value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OpOperand {
  pub owner: Operation,
  pub index: usize,
}

/// Data of value.
///
/// Holds the type, the producer and the use list of a value.
#[derive(Clone, Debug)]
pub struct ValueData {
  ty: Type,
  kind: ValueKind,
  uses: Vec<OpOperand>,
}

/// Producer of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
  /// The `index`-th result of an operation.
  OpResult { owner: Operation, index: usize },
  /// The `index`-th argument of a block. Both fields are `None` after
  /// the argument has been removed from its block.
  BlockArgument {
    owner: Option<Block>,
    index: Option<usize>,
  },
}

impl ValueData {
  pub(in crate::ir) fn new(ty: Type, kind: ValueKind) -> Self {
    Self {
      ty,
      kind,
      uses: Vec::new(),
    }
  }

  /// Returns a reference to the type of the value.
  pub fn ty(&self) -> &Type {
    &self.ty
  }

  /// Returns the producer of the value.
  pub fn kind(&self) -> &ValueKind {
    &self.kind
  }

  pub(in crate::ir) fn kind_mut(&mut self) -> &mut ValueKind {
    &mut self.kind
  }

  /// Returns the use list of the value, in insertion order.
  pub fn uses(&self) -> &[OpOperand] {
    &self.uses
  }

  /// Returns `true` if the value has no uses.
  pub fn use_empty(&self) -> bool {
    self.uses.is_empty()
  }

  /// Returns `true` if the value is an operation result.
  pub fn is_result(&self) -> bool {
    matches!(self.kind, ValueKind::OpResult { .. })
  }

  /// Returns `true` if the value is a block argument.
  pub fn is_argument(&self) -> bool {
    matches!(self.kind, ValueKind::BlockArgument { .. })
  }

  /// Returns the position of the value in its owner,
  /// `None` for detached block arguments.
  pub fn index(&self) -> Option<usize> {
    match self.kind {
      ValueKind::OpResult { index, .. } => Some(index),
      ValueKind::BlockArgument { index, .. } => index,
    }
  }

  /// Returns the operation that defines the value, if it is a result.
  pub fn defining_op(&self) -> Option<Operation> {
    match self.kind {
      ValueKind::OpResult { owner, .. } => Some(owner),
      ValueKind::BlockArgument { .. } => None,
    }
  }

  /// Returns the block that owns the value, if it is an attached
  /// block argument.
  pub fn owner_block(&self) -> Option<Block> {
    match self.kind {
      ValueKind::BlockArgument { owner, .. } => owner,
      ValueKind::OpResult { .. } => None,
    }
  }

  pub(in crate::ir) fn add_use(&mut self, operand: OpOperand) {
    self.uses.push(operand);
  }

  pub(in crate::ir) fn remove_use(&mut self, operand: OpOperand) {
    if let Some(pos) = self.uses.iter().position(|u| *u == operand) {
      self.uses.remove(pos);
    }
  }

  pub(in crate::ir) fn take_uses(&mut self) -> Vec<OpOperand> {
    std::mem::take(&mut self.uses)
  }
}

/// Data of operation.
pub struct OperationData {
  pub(in crate::ir) name: String,
  pub(in crate::ir) operands: Vec<Value>,
  pub(in crate::ir) results: Vec<Value>,
  pub(in crate::ir) attrs: AttrMap,
  pub(in crate::ir) regions: Vec<Region>,
  pub(in crate::ir) successors: Vec<Block>,
  pub(in crate::ir) parent: Option<Block>,
  pub(in crate::ir) traits: Vec<OpTrait>,
  pub(in crate::ir) verifiers: Vec<OpVerifier>,
  pub(in crate::ir) symbols: Option<SymbolTable>,
}

impl OperationData {
  /// Returns the name of the operation.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Returns the operand values, in operand order.
  pub fn operands(&self) -> &[Value] {
    &self.operands
  }

  /// Returns the `index`-th operand value.
  pub fn operand(&self, index: usize) -> Option<Value> {
    self.operands.get(index).copied()
  }

  /// Returns the result values, in result order.
  pub fn results(&self) -> &[Value] {
    &self.results
  }

  /// Returns the `index`-th result value.
  pub fn result(&self, index: usize) -> Option<Value> {
    self.results.get(index).copied()
  }

  /// Returns a reference to the attribute map.
  pub fn attrs(&self) -> &AttrMap {
    &self.attrs
  }

  /// Returns the attribute of the given name.
  pub fn attr(&self, name: &str) -> Option<&Attribute> {
    self.attrs.get(name)
  }

  /// Returns the nested regions.
  pub fn regions(&self) -> &[Region] {
    &self.regions
  }

  /// Returns the `index`-th nested region.
  pub fn region(&self, index: usize) -> Option<Region> {
    self.regions.get(index).copied()
  }

  /// Returns the successor blocks.
  pub fn successors(&self) -> &[Block] {
    &self.successors
  }

  /// Returns the block that contains the operation.
  pub fn parent(&self) -> Option<Block> {
    self.parent
  }

  /// Returns the traits of the operation.
  pub fn traits(&self) -> &[OpTrait] {
    &self.traits
  }

  /// Returns the extra verifiers of the operation.
  pub fn verifiers(&self) -> &[OpVerifier] {
    &self.verifiers
  }

  /// Returns `true` if the operation carries the given trait.
  pub fn has_trait(&self, tr: OpTrait) -> bool {
    self.traits.contains(&tr)
  }

  /// Returns `true` if the operation is a block terminator.
  pub fn is_terminator(&self) -> bool {
    self.has_trait(OpTrait::Terminator)
  }

  /// Returns the symbol name of the operation, if it defines one.
  pub fn sym_name(&self) -> Option<&str> {
    self.attr(OpTrait::SYM_NAME).and_then(|a| a.as_str())
  }

  /// Returns the symbol table, if the operation carries one.
  pub fn symbol_table(&self) -> Option<&SymbolTable> {
    self.symbols.as_ref()
  }
}

/// Data of block.
///
/// A block holds its arguments and the order of its operations.
pub struct BlockData {
  pub(in crate::ir) args: Vec<Value>,
  pub(in crate::ir) ops: OpList,
  pub(in crate::ir) owner: Option<Region>,
}

impl BlockData {
  pub(in crate::ir) fn new() -> Self {
    Self {
      args: Vec::new(),
      ops: OpList::with_map(HashMap::new()),
      owner: None,
    }
  }

  /// Returns the arguments of the block.
  pub fn arguments(&self) -> &[Value] {
    &self.args
  }

  /// Returns the `index`-th argument of the block.
  pub fn argument(&self, index: usize) -> Option<Value> {
    self.args.get(index).copied()
  }

  /// Returns the number of arguments.
  pub fn num_arguments(&self) -> usize {
    self.args.len()
  }

  /// Returns a reference to the operation list.
  pub fn ops(&self) -> &OpList {
    &self.ops
  }

  /// Returns the number of operations.
  pub fn num_ops(&self) -> usize {
    self.ops.len()
  }

  /// Returns the operation at the given position.
  pub fn op_at(&self, index: usize) -> Option<Operation> {
    self.ops.keys().nth(index).copied()
  }

  /// Returns the first operation.
  pub fn front(&self) -> Option<Operation> {
    self.ops.front_key().copied()
  }

  /// Returns the last operation.
  pub fn back(&self) -> Option<Operation> {
    self.ops.back_key().copied()
  }

  /// Returns `true` if the block contains no operation.
  pub fn is_empty(&self) -> bool {
    self.ops.is_empty()
  }

  /// Returns the region that owns the block.
  pub fn owner(&self) -> Option<Region> {
    self.owner
  }
}

/// Data of region.
pub struct RegionData {
  pub(in crate::ir) blocks: BlockList,
  pub(in crate::ir) parent: Option<Operation>,
}

impl RegionData {
  pub(in crate::ir) fn new() -> Self {
    Self {
      blocks: BlockList::with_map(HashMap::new()),
      parent: None,
    }
  }

  /// Returns a reference to the block list.
  pub fn blocks(&self) -> &BlockList {
    &self.blocks
  }

  /// Returns the block at the given position.
  pub fn block_at(&self, index: usize) -> Option<Block> {
    self.blocks.keys().nth(index).copied()
  }

  /// Returns the number of blocks.
  pub fn size(&self) -> usize {
    self.blocks.len()
  }

  /// Returns `true` if the region contains no block.
  pub fn is_empty(&self) -> bool {
    self.blocks.is_empty()
  }

  /// Returns the first (entry) block.
  pub fn front(&self) -> Option<Block> {
    self.blocks.front_key().copied()
  }

  /// Returns the last block.
  pub fn back(&self) -> Option<Block> {
    self.blocks.back_key().copied()
  }

  /// Returns the operation that owns the region.
  pub fn parent(&self) -> Option<Operation> {
    self.parent
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::context::Context;

  #[test]
  fn use_list_keeps_insertion_order() {
    let mut ctx = Context::new();
    let ty = Type::get_signless(&mut ctx, 32);
    let mut data = ValueData::new(
      ty,
      ValueKind::BlockArgument {
        owner: None,
        index: None,
      },
    );
    let u1 = OpOperand {
      owner: Operation(1),
      index: 0,
    };
    let u2 = OpOperand {
      owner: Operation(2),
      index: 1,
    };
    data.add_use(u2);
    data.add_use(u1);
    assert_eq!(data.uses(), &[u2, u1]);
    data.remove_use(u2);
    assert_eq!(data.uses(), &[u1]);
    assert!(data.is_argument());
    assert_eq!(data.index(), None);
    assert_eq!(data.owner_block(), None);
  }

  #[test]
  fn handle_display() {
    assert_eq!(Operation(3).to_string(), "op3");
    assert_eq!(Block(1).to_string(), "^bb1");
    assert_eq!(Region(2).to_string(), "region2");
    assert_eq!(Value(7).to_string(), "%7");
  }
}
