use crate::error::{EditError, IndexError, SymbolError};
use crate::ir::attrs::AttrMap;
use crate::ir::builder::{op_validator, OpDef, OpRef, OperationState, OPERANDS_EXIST};
use crate::ir::entities::{
  Block, BlockData, OpOperand, Operation, OperationData, Region, RegionData, Value, ValueData,
  ValueKind,
};
use crate::ir::idman::{next_op_id, next_value_id};
use crate::ir::traits::OpTrait;
use crate::validator::ValidationError;
use std::collections::{HashMap, HashSet};

/// Data flow graph of the IR.
///
/// `DataFlowGraph` holds all data of operations ([`OperationData`]),
/// blocks ([`BlockData`]), regions ([`RegionData`]) and values
/// ([`ValueData`]), and maintains their use-define chains and
/// parent links.
///
/// Looking up a handle that was never created by, or was already erased
/// from, the current graph is a bug of the caller, and panics.
#[derive(Default)]
pub struct DataFlowGraph {
  pub(in crate::ir) values: HashMap<Value, ValueData>,
  pub(in crate::ir) ops: HashMap<Operation, OperationData>,
  pub(in crate::ir) blocks: HashMap<Block, BlockData>,
  pub(in crate::ir) regions: HashMap<Region, RegionData>,
}

impl DataFlowGraph {
  /// Creates a new empty data flow graph.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a reference to the value map.
  pub fn values(&self) -> &HashMap<Value, ValueData> {
    &self.values
  }

  /// Returns a reference to the operation map.
  pub fn ops(&self) -> &HashMap<Operation, OperationData> {
    &self.ops
  }

  /// Returns a reference to the block map.
  pub fn blocks(&self) -> &HashMap<Block, BlockData> {
    &self.blocks
  }

  /// Returns a reference to the region map.
  pub fn regions(&self) -> &HashMap<Region, RegionData> {
    &self.regions
  }

  /// Returns a reference to the given value.
  ///
  /// # Panics
  ///
  /// Panics if the given value does not exist.
  pub fn value(&self, value: Value) -> &ValueData {
    self.values.get(&value).expect("`value` does not exist")
  }

  pub(in crate::ir) fn value_mut(&mut self, value: Value) -> &mut ValueData {
    self.values.get_mut(&value).expect("`value` does not exist")
  }

  /// Returns a reference to the given operation.
  ///
  /// # Panics
  ///
  /// Panics if the given operation does not exist.
  pub fn op(&self, op: Operation) -> &OperationData {
    self.ops.get(&op).expect("`op` does not exist")
  }

  pub(in crate::ir) fn op_mut(&mut self, op: Operation) -> &mut OperationData {
    self.ops.get_mut(&op).expect("`op` does not exist")
  }

  /// Returns a reference to the given block.
  ///
  /// # Panics
  ///
  /// Panics if the given block does not exist.
  pub fn block(&self, block: Block) -> &BlockData {
    self.blocks.get(&block).expect("`block` does not exist")
  }

  pub(in crate::ir) fn block_mut(&mut self, block: Block) -> &mut BlockData {
    self.blocks.get_mut(&block).expect("`block` does not exist")
  }

  /// Returns a reference to the given region.
  ///
  /// # Panics
  ///
  /// Panics if the given region does not exist.
  pub fn region(&self, region: Region) -> &RegionData {
    self.regions.get(&region).expect("`region` does not exist")
  }

  pub(in crate::ir) fn region_mut(&mut self, region: Region) -> &mut RegionData {
    self.regions.get_mut(&region).expect("`region` does not exist")
  }

  /// Creates a new operation from the given state. Returns the handle of
  /// the created operation.
  ///
  /// Every built-in rule, trait rule and extra verifier of the operation
  /// runs before the operation becomes visible. If any of them fails,
  /// all failures are returned and the graph is left unchanged.
  pub fn create_operation(&mut self, state: OperationState) -> Result<Operation, ValidationError> {
    let op = Operation(next_op_id());
    let OperationState {
      name,
      operands,
      attrs,
      regions,
      successors,
      parent,
      result_types,
      traits,
      verifiers,
    } = state;
    // results are created first, so that rules can see their types
    let results: Vec<_> = result_types
      .into_iter()
      .enumerate()
      .map(|(index, ty)| {
        let value = Value(next_value_id());
        let kind = ValueKind::OpResult { owner: op, index };
        self.values.insert(value, ValueData::new(ty, kind));
        value
      })
      .collect();
    let symbols = traits.contains(&OpTrait::SymbolTable).then(HashMap::new);
    // the parent is only recorded for the rules, the op is not in the
    // block until it is attached below
    let mut data = OperationData {
      name,
      operands,
      results,
      attrs,
      regions,
      successors,
      parent,
      traits,
      verifiers,
      symbols,
    };
    let outcome = op_validator(&data).run(&OpRef {
      dfg: self,
      op,
      data: &data,
    });
    data.parent = None;
    if let Err(e) = outcome {
      for r in &data.results {
        self.values.remove(r);
      }
      return Err(e);
    }

    for (index, v) in data.operands.iter().enumerate() {
      self.value_mut(*v).add_use(OpOperand { owner: op, index });
    }
    for r in &data.regions {
      self.region_mut(*r).parent = Some(op);
    }
    self.ops.insert(op, data);
    if let Some(block) = parent {
      self.attach_op(block, None, op);
    }
    Ok(op)
  }

  /// Creates a new operation of the given definition.
  ///
  /// Result types are computed by [`OpDef::create_results`], after all
  /// operands are checked to exist.
  pub fn new_op<O: OpDef>(
    &mut self,
    operands: Vec<Value>,
    attrs: AttrMap,
    regions: Vec<Region>,
    parent: Option<Block>,
  ) -> Result<Operation, ValidationError> {
    if let Some(v) = operands.iter().find(|v| !self.values.contains_key(*v)) {
      return Err(ValidationError::single(
        OPERANDS_EXIST.name,
        format!("operand of {} refers to value {} that does not exist", O::NAME, v),
      ));
    }
    let results = O::create_results(self, &operands, &attrs);
    let mut state = OperationState::new(O::NAME)
      .operands(operands)
      .attrs(attrs)
      .regions(regions)
      .results(results)
      .traits(O::TRAITS.iter().copied());
    if let Some(block) = parent {
      state = state.parent(block);
    }
    for verifier in O::verifiers() {
      state = state.verifier(verifier);
    }
    self.create_operation(state)
  }

  /// Sets the `index`-th operand of the given operation to `value`,
  /// and moves the use edge to the new value.
  ///
  /// # Panics
  ///
  /// Panics if the given operation or value does not exist.
  pub fn set_operand(
    &mut self,
    op: Operation,
    index: usize,
    value: Value,
  ) -> Result<(), EditError> {
    let len = self.op(op).operands.len();
    if index >= len {
      return Err(
        IndexError {
          what: "operands",
          index,
          len,
        }
        .into(),
      );
    }
    assert!(self.values.contains_key(&value), "`value` does not exist");
    let operand = OpOperand { owner: op, index };
    let old = std::mem::replace(&mut self.op_mut(op).operands[index], value);
    self.value_mut(old).remove_use(operand);
    self.value_mut(value).add_use(operand);
    Ok(())
  }

  /// Replaces all uses of `from` with `to`.
  ///
  /// # Panics
  ///
  /// Panics if any of the given values does not exist.
  pub fn replace_all_uses_with(&mut self, from: Value, to: Value) {
    assert!(self.values.contains_key(&to), "`to` does not exist");
    if from == to {
      return;
    }
    for operand in self.value_mut(from).take_uses() {
      self.op_mut(operand.owner).operands[operand.index] = to;
      self.value_mut(to).add_use(operand);
    }
  }

  /// Erases the given operation, together with all of its nested
  /// regions, blocks and operations.
  ///
  /// Fails if a result of the erased operations, or an argument of the
  /// erased blocks, is still used by an operation outside of the erased
  /// subtree, or if an erased block is a successor of such an operation.
  /// The graph is left unchanged on failure.
  ///
  /// Every symbol defined in the subtree is removed from the symbol
  /// tables that survive the erasure.
  ///
  /// # Panics
  ///
  /// Panics if the given operation does not exist.
  pub fn erase_op(&mut self, op: Operation) -> Result<(), EditError> {
    let mut ops = Vec::new();
    let mut blocks = Vec::new();
    let mut regions = Vec::new();
    self.collect_subtree(op, &mut ops, &mut blocks, &mut regions);
    let op_set: HashSet<_> = ops.iter().copied().collect();
    let defined: Vec<Value> = ops
      .iter()
      .flat_map(|o| self.op(*o).results.iter().copied())
      .chain(blocks.iter().flat_map(|b| self.block(*b).args.iter().copied()))
      .collect();
    for v in &defined {
      if let Some(user) = self
        .value(*v)
        .uses()
        .iter()
        .find(|u| !op_set.contains(&u.owner))
      {
        return Err(EditError::InUse {
          value: *v,
          user: user.owner,
        });
      }
    }

    let block_set: HashSet<_> = blocks.iter().copied().collect();
    let outer_users = self.ops.iter().filter(|(o, _)| !op_set.contains(*o));
    for (user, data) in outer_users {
      if let Some(block) = data.successors.iter().find(|b| block_set.contains(*b)) {
        return Err(EditError::BlockInUse {
          block: *block,
          user: *user,
        });
      }
    }

    // detach from the outer world
    for (o, data) in self.ops.iter_mut() {
      if let Some(symbols) = data.symbols.as_mut().filter(|_| !op_set.contains(o)) {
        symbols.retain(|_, sym| !op_set.contains(sym));
      }
    }
    if let Some(block) = self.op(op).parent {
      self.detach_op(block, op);
    }
    for o in &ops {
      let operands = self.op(*o).operands.clone();
      for (index, v) in operands.into_iter().enumerate() {
        if let Some(data) = self.values.get_mut(&v) {
          data.remove_use(OpOperand { owner: *o, index });
        }
      }
    }

    for v in defined {
      self.values.remove(&v);
    }
    for o in ops {
      self.ops.remove(&o);
    }
    for b in blocks {
      self.blocks.remove(&b);
    }
    for r in regions {
      self.regions.remove(&r);
    }
    Ok(())
  }

  /// Collects the given operation and everything nested under it.
  fn collect_subtree(
    &self,
    op: Operation,
    ops: &mut Vec<Operation>,
    blocks: &mut Vec<Block>,
    regions: &mut Vec<Region>,
  ) {
    ops.push(op);
    for r in self.op(op).regions() {
      regions.push(*r);
      for b in self.region(*r).blocks().keys() {
        blocks.push(*b);
        for o in self.block(*b).ops().keys() {
          self.collect_subtree(*o, ops, blocks, regions);
        }
      }
    }
  }

  /// Returns `true` if the given block is nested, at any depth, inside
  /// one of the given regions.
  ///
  /// Dangling links are treated as the end of the walk.
  pub(in crate::ir) fn is_block_inside(&self, block: Block, regions: &[Region]) -> bool {
    let mut cur = block;
    loop {
      let region = match self.blocks.get(&cur).and_then(|b| b.owner) {
        Some(region) => region,
        None => return false,
      };
      if regions.contains(&region) {
        return true;
      }
      let parent = self
        .regions
        .get(&region)
        .and_then(|r| r.parent)
        .and_then(|o| self.ops.get(&o))
        .and_then(|o| o.parent);
      match parent {
        Some(b) => cur = b,
        None => return false,
      }
    }
  }

  /// Registers the given symbol operation in the symbol table of
  /// `table`.
  ///
  /// # Panics
  ///
  /// Panics if any of the given operations does not exist.
  pub fn insert_symbol(&mut self, table: Operation, symbol: Operation) -> Result<(), SymbolError> {
    let name = match self.op(symbol) {
      data if data.has_trait(OpTrait::Symbol) => data
        .sym_name()
        .ok_or(SymbolError::NotASymbol(symbol))?
        .to_string(),
      _ => return Err(SymbolError::NotASymbol(symbol)),
    };
    let symbols = self
      .op_mut(table)
      .symbols
      .as_mut()
      .ok_or(SymbolError::NoSymbolTable(table))?;
    match symbols.get(&name) {
      Some(existing) => Err(SymbolError::Duplicate {
        name,
        existing: *existing,
      }),
      None => {
        symbols.insert(name, symbol);
        Ok(())
      }
    }
  }

  /// Looks up a symbol in the symbol table of `table`. Returns `None` if
  /// the symbol is not found, or `table` has no symbol table.
  ///
  /// # Panics
  ///
  /// Panics if the given operation does not exist.
  pub fn lookup_symbol(&self, table: Operation, name: &str) -> Option<Operation> {
    self.op(table).symbols.as_ref()?.get(name).copied()
  }

  /// Removes a symbol from the symbol table of `table`. Returns the
  /// operation that defined it, if any.
  ///
  /// # Panics
  ///
  /// Panics if the given operation does not exist.
  pub fn remove_symbol(
    &mut self,
    table: Operation,
    name: &str,
  ) -> Result<Option<Operation>, SymbolError> {
    let symbols = self
      .op_mut(table)
      .symbols
      .as_mut()
      .ok_or(SymbolError::NoSymbolTable(table))?;
    Ok(symbols.remove(name))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::context::Context;
  use crate::ir::attrs::Attribute;
  use crate::ir::module::ModuleOp;
  use crate::ir::testing::{Add, Constant, Func, Table};
  use crate::ir::traits;
  use crate::ir::types::Type;
  use crate::ir::verify::verify;

  fn constant(ctx: &mut Context, dfg: &mut DataFlowGraph, v: i128, parent: Option<Block>) -> Value {
    let op = Constant::build(ctx, dfg, v, parent);
    dfg.op(op).results()[0]
  }

  #[test]
  fn operands_register_uses() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let a = constant(&mut ctx, &mut dfg, 1, None);
    let b = constant(&mut ctx, &mut dfg, 2, None);
    let add = dfg.new_op::<Add>(vec![a, b, a], AttrMap::new(), vec![], None);
    // three operands for a two-operand op
    let err = add.unwrap_err();
    assert!(err.contains("requires exactly 2 operands, but got 3"));
    assert!(dfg.value(a).use_empty());

    let add = dfg.new_op::<Add>(vec![a, a], AttrMap::new(), vec![], None).unwrap();
    assert_eq!(
      dfg.value(a).uses(),
      &[
        OpOperand { owner: add, index: 0 },
        OpOperand { owner: add, index: 1 }
      ]
    );
    let r = dfg.op(add).result(0).unwrap();
    assert_eq!(
      *dfg.value(r).kind(),
      ValueKind::OpResult { owner: add, index: 0 }
    );
    assert!(dfg.value(r).ty().ptr_eq(dfg.value(a).ty()));
  }

  #[test]
  fn failed_construction_leaves_no_trace() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let ty = Type::get_signless(&mut ctx, 32);
    let values = dfg.values().len();
    let state = OperationState::new("test.bad")
      .result(ty)
      .traits([traits::ZERO_RESULTS, traits::ONE_OPERAND]);
    let err = dfg.create_operation(state).unwrap_err();
    assert_eq!(err.len(), 2);
    assert!(err.has_rule("n-results"));
    assert!(err.has_rule("n-operands"));
    assert_eq!(dfg.values().len(), values);
    assert!(dfg.ops().is_empty());
  }

  #[test]
  fn dangling_operand() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let mut other = DataFlowGraph::new();
    let foreign = constant(&mut ctx, &mut other, 1, None);
    let err = dfg
      .new_op::<Add>(vec![foreign, foreign], AttrMap::new(), vec![], None)
      .unwrap_err();
    assert!(err.has_rule("operands-exist"));
    let err = dfg
      .create_operation(OperationState::new("test.op").operand(foreign))
      .unwrap_err();
    assert!(err.contains("does not exist"));
  }

  #[test]
  fn regions_are_owned_once() {
    let mut dfg = DataFlowGraph::new();
    let r = dfg.new_region();
    let outer = dfg
      .create_operation(OperationState::new("test.outer").region(r))
      .unwrap();
    assert_eq!(dfg.region(r).parent(), Some(outer));
    let err = dfg
      .create_operation(OperationState::new("test.other").region(r))
      .unwrap_err();
    assert!(err.contains("already owned"));
    let r2 = dfg.new_region();
    let err = dfg
      .create_operation(OperationState::new("test.twice").regions([r2, r2]))
      .unwrap_err();
    assert!(err.contains("appears twice"));
  }

  #[test]
  fn parent_in_own_region_is_rejected() {
    let mut dfg = DataFlowGraph::new();
    let block = dfg.new_block();
    let r = dfg.new_region();
    dfg.push_block_back(r, block).unwrap();
    let err = dfg
      .create_operation(OperationState::new("test.loop").region(r).parent(block))
      .unwrap_err();
    assert!(err.has_rule("parent-acyclic"));
    assert!(dfg.region(r).parent().is_none());

    let ok = dfg
      .create_operation(OperationState::new("test.outer").region(r))
      .unwrap();
    let inner = dfg
      .create_operation(OperationState::new("test.inner").parent(block))
      .unwrap();
    assert_eq!(dfg.op(inner).parent(), Some(block));
    assert_eq!(dfg.block(block).back(), Some(inner));
    assert_eq!(dfg.parent_op(block), Some(ok));
  }

  #[test]
  fn set_operand_moves_use() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let a = constant(&mut ctx, &mut dfg, 1, None);
    let b = constant(&mut ctx, &mut dfg, 2, None);
    let add = dfg.new_op::<Add>(vec![a, a], AttrMap::new(), vec![], None).unwrap();
    dfg.set_operand(add, 1, b).unwrap();
    assert_eq!(dfg.op(add).operands(), &[a, b]);
    assert_eq!(dfg.value(a).uses(), &[OpOperand { owner: add, index: 0 }]);
    assert_eq!(dfg.value(b).uses(), &[OpOperand { owner: add, index: 1 }]);
    assert!(matches!(
      dfg.set_operand(add, 2, b),
      Err(EditError::Index(IndexError { index: 2, len: 2, .. }))
    ));
  }

  #[test]
  fn replace_all_uses() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let a = constant(&mut ctx, &mut dfg, 1, None);
    let b = constant(&mut ctx, &mut dfg, 2, None);
    let add1 = dfg.new_op::<Add>(vec![a, b], AttrMap::new(), vec![], None).unwrap();
    let add2 = dfg.new_op::<Add>(vec![a, a], AttrMap::new(), vec![], None).unwrap();
    dfg.replace_all_uses_with(a, b);
    assert!(dfg.value(a).use_empty());
    assert_eq!(dfg.value(b).uses().len(), 4);
    assert_eq!(dfg.op(add1).operands(), &[b, b]);
    assert_eq!(dfg.op(add2).operands(), &[b, b]);
    dfg.replace_all_uses_with(b, b);
    assert_eq!(dfg.value(b).uses().len(), 4);
  }

  #[test]
  fn erase_op_checks_uses() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let block = dfg.new_block();
    let a = constant(&mut ctx, &mut dfg, 1, Some(block));
    let def = dfg.value(a).defining_op().unwrap();
    let add = dfg
      .new_op::<Add>(vec![a, a], AttrMap::new(), vec![], Some(block))
      .unwrap();
    assert_eq!(
      dfg.erase_op(def),
      Err(EditError::InUse { value: a, user: add })
    );
    assert_eq!(dfg.block(block).num_ops(), 2);

    dfg.erase_op(add).unwrap();
    assert!(dfg.value(a).use_empty());
    assert!(!dfg.ops().contains_key(&add));
    assert_eq!(dfg.block(block).num_ops(), 1);
    dfg.erase_op(def).unwrap();
    assert!(!dfg.values().contains_key(&a));
    assert!(dfg.block(block).is_empty());
  }

  #[test]
  fn erase_op_with_nested_regions() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let ty = Type::get_signless(&mut ctx, 32);
    let body = dfg.new_block_with_args([ty]);
    let arg = dfg.block(body).arguments()[0];
    let region = dfg.new_region_with_blocks([body]).unwrap();
    let outer = dfg
      .create_operation(OperationState::new("test.outer").region(region))
      .unwrap();
    let inner = dfg
      .new_op::<Add>(vec![arg, arg], AttrMap::new(), vec![], Some(body))
      .unwrap();
    dfg.erase_op(outer).unwrap();
    assert!(!dfg.ops().contains_key(&inner));
    assert!(!dfg.blocks().contains_key(&body));
    assert!(!dfg.regions().contains_key(&region));
    assert!(!dfg.values().contains_key(&arg));
  }

  #[test]
  fn erase_op_drops_nested_symbols() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let module = ModuleOp::build(&mut dfg).unwrap();
    let body = dfg.new_block();
    let region = dfg.new_region_with_blocks([body]).unwrap();
    let holder = dfg
      .create_operation(OperationState::new("test.holder").region(region))
      .unwrap();
    ModuleOp::append(&mut dfg, module, holder).unwrap();
    let g = Func::build(&mut ctx, &mut dfg, "g").unwrap();
    dfg.push_op_back(body, g).unwrap();
    dfg.insert_symbol(module, g).unwrap();
    let f = Func::build(&mut ctx, &mut dfg, "f").unwrap();
    ModuleOp::append(&mut dfg, module, f).unwrap();

    dfg.erase_op(holder).unwrap();
    assert_eq!(dfg.lookup_symbol(module, "g"), None);
    assert_eq!(dfg.lookup_symbol(module, "f"), Some(f));
    assert!(!dfg.ops().contains_key(&g));
    assert!(verify(&dfg, module).is_ok());
  }

  #[test]
  fn erase_op_checks_successors() {
    let mut dfg = DataFlowGraph::new();
    let entry = dfg.new_block();
    let target = dfg.new_block();
    let region = dfg.new_region_with_blocks([target]).unwrap();
    let holder = dfg
      .create_operation(OperationState::new("test.holder").region(region).parent(entry))
      .unwrap();
    let br = dfg
      .create_operation(
        OperationState::new("test.br")
          .traits([OpTrait::Terminator])
          .successor(target)
          .parent(entry),
      )
      .unwrap();
    assert_eq!(
      dfg.erase_op(holder),
      Err(EditError::BlockInUse {
        block: target,
        user: br
      })
    );
    assert!(dfg.blocks().contains_key(&target));
    assert_eq!(dfg.block(entry).num_ops(), 2);
    assert_eq!(dfg.successors(entry), &[target]);

    dfg.erase_op(br).unwrap();
    dfg.erase_op(holder).unwrap();
    assert!(!dfg.blocks().contains_key(&target));
    assert!(dfg.block(entry).is_empty());
  }

  #[test]
  fn symbols() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let table = Table::build(&mut dfg).unwrap();
    let f = Func::build(&mut ctx, &mut dfg, "f").unwrap();
    let g = Func::build(&mut ctx, &mut dfg, "f").unwrap();
    let plain = dfg.create_operation(OperationState::new("test.plain")).unwrap();

    dfg.insert_symbol(table, f).unwrap();
    assert_eq!(dfg.lookup_symbol(table, "f"), Some(f));
    assert_eq!(
      dfg.insert_symbol(table, g),
      Err(SymbolError::Duplicate {
        name: "f".into(),
        existing: f
      })
    );
    assert_eq!(
      dfg.insert_symbol(table, plain),
      Err(SymbolError::NotASymbol(plain))
    );
    assert_eq!(dfg.insert_symbol(f, g), Err(SymbolError::NoSymbolTable(f)));
    assert_eq!(dfg.lookup_symbol(plain, "f"), None);

    // uniqueness is scoped to one table
    let other = Table::build(&mut dfg).unwrap();
    dfg.insert_symbol(other, g).unwrap();
    assert_eq!(dfg.remove_symbol(table, "f"), Ok(Some(f)));
    assert_eq!(dfg.lookup_symbol(table, "f"), None);
    assert_eq!(dfg.remove_symbol(f, "f"), Err(SymbolError::NoSymbolTable(f)));
  }

  #[test]
  fn symbol_requires_name() {
    let mut ctx = Context::new();
    let mut dfg = DataFlowGraph::new();
    let err = dfg
      .create_operation(OperationState::new("test.sym").traits([OpTrait::Symbol]))
      .unwrap_err();
    assert!(err.contains("requires attribute `sym_name`"));
    let one = Attribute::index(&mut ctx, 1).unwrap();
    let err = dfg
      .create_operation(
        OperationState::new("test.sym")
          .traits([OpTrait::Symbol])
          .attr("sym_name", one),
      )
      .unwrap_err();
    assert!(err.contains("to be a string"));
  }
}
