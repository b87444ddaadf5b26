//! Operation definitions shared by unit tests.

use crate::context::Context;
use crate::ir::attrs::{AttrMap, Attribute};
use crate::ir::builder::{OpDef, OpRef, OpVerifier};
use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::{Block, Operation, Value};
use crate::ir::traits::{self, OpTrait};
use crate::ir::types::Type;
use crate::validator::ValidationError;

/// `test.constant`, one `value` attribute and one result of its type.
pub struct Constant;

impl OpDef for Constant {
  const NAME: &'static str = "test.constant";
  const TRAITS: &'static [OpTrait] = &[traits::ZERO_OPERANDS, traits::ONE_RESULT];

  fn create_results(_: &DataFlowGraph, _: &[Value], attrs: &AttrMap) -> Vec<Type> {
    attrs.get("value").map(|a| a.ty().clone()).into_iter().collect()
  }
}

impl Constant {
  pub fn build(
    ctx: &mut Context,
    dfg: &mut DataFlowGraph,
    v: i128,
    parent: Option<Block>,
  ) -> Operation {
    let ty = Type::get_signless(ctx, 32);
    let mut attrs = AttrMap::new();
    attrs.insert("value".into(), Attribute::integer(ctx, ty, v).unwrap());
    dfg.new_op::<Self>(Vec::new(), attrs, Vec::new(), parent).unwrap()
  }
}

/// `test.add`, two operands of the same type and one result of that type.
pub struct Add;

impl OpDef for Add {
  const NAME: &'static str = "test.add";
  const TRAITS: &'static [OpTrait] = &[traits::TWO_OPERANDS, traits::ONE_RESULT];

  fn create_results(dfg: &DataFlowGraph, operands: &[Value], _: &AttrMap) -> Vec<Type> {
    operands.first().map(|v| dfg.value(*v).ty().clone()).into_iter().collect()
  }

  fn verifiers() -> Vec<OpVerifier> {
    vec![OpVerifier {
      name: "same-operand-types",
      check: same_operand_types,
    }]
  }
}

fn same_operand_types(op: &OpRef) -> Result<(), String> {
  let mut types = op.data.operands().iter().map(|v| op.dfg.value(*v).ty());
  match types.next() {
    Some(first) if types.any(|ty| ty != first) => {
      Err(format!("{} requires operands of the same type", op.data.name()))
    }
    _ => Ok(()),
  }
}

/// `test.func`, a symbol with one region.
pub struct Func;

impl OpDef for Func {
  const NAME: &'static str = "test.func";
  const TRAITS: &'static [OpTrait] = &[
    traits::ZERO_OPERANDS,
    traits::ZERO_RESULTS,
    traits::ONE_REGION,
    OpTrait::Symbol,
  ];

  fn create_results(_: &DataFlowGraph, _: &[Value], _: &AttrMap) -> Vec<Type> {
    Vec::new()
  }
}

impl Func {
  pub fn build(
    ctx: &mut Context,
    dfg: &mut DataFlowGraph,
    name: &str,
  ) -> Result<Operation, ValidationError> {
    let mut attrs = AttrMap::new();
    attrs.insert(OpTrait::SYM_NAME.into(), Attribute::string(ctx, name));
    let region = dfg.new_region();
    dfg.new_op::<Self>(Vec::new(), attrs, vec![region], None)
  }
}

/// `test.table`, a symbol table with no region.
pub struct Table;

impl OpDef for Table {
  const NAME: &'static str = "test.table";
  const TRAITS: &'static [OpTrait] = &[traits::ZERO_OPERANDS, OpTrait::SymbolTable];

  fn create_results(_: &DataFlowGraph, _: &[Value], _: &AttrMap) -> Vec<Type> {
    Vec::new()
  }
}

impl Table {
  pub fn build(dfg: &mut DataFlowGraph) -> Result<Operation, ValidationError> {
    dfg.new_op::<Self>(Vec::new(), AttrMap::new(), Vec::new(), None)
  }
}
