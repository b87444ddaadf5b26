//! Operation construction: the generic builder ([`OperationState`]),
//! typed operation definitions ([`OpDef`]) and per-operation rules
//! ([`OpVerifier`]).

use crate::ir::attrs::{AttrMap, Attribute};
use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::{Block, Operation, OperationData, Region, Value, ValueKind};
use crate::ir::traits::OpTrait;
use crate::ir::types::Type;
use crate::validator::{Rule, Validator};
use std::collections::HashSet;

/// Everything needed to create an operation.
///
/// `OperationState` is consumed by
/// [`DataFlowGraph::create_operation`](DataFlowGraph::create_operation).
#[derive(Clone, Default)]
pub struct OperationState {
  pub(in crate::ir) name: String,
  pub(in crate::ir) operands: Vec<Value>,
  pub(in crate::ir) attrs: AttrMap,
  pub(in crate::ir) regions: Vec<Region>,
  pub(in crate::ir) successors: Vec<Block>,
  pub(in crate::ir) parent: Option<Block>,
  pub(in crate::ir) result_types: Vec<Type>,
  pub(in crate::ir) traits: Vec<OpTrait>,
  pub(in crate::ir) verifiers: Vec<OpVerifier>,
}

impl OperationState {
  /// Creates a new state for an operation of the given name.
  pub fn new<S: Into<String>>(name: S) -> Self {
    Self {
      name: name.into(),
      ..Default::default()
    }
  }

  /// Appends an operand.
  pub fn operand(mut self, value: Value) -> Self {
    self.operands.push(value);
    self
  }

  /// Appends operands.
  pub fn operands<I: IntoIterator<Item = Value>>(mut self, values: I) -> Self {
    self.operands.extend(values);
    self
  }

  /// Sets an attribute, replaces the old one of the same name.
  pub fn attr<S: Into<String>>(mut self, name: S, attr: Attribute) -> Self {
    self.attrs.insert(name.into(), attr);
    self
  }

  /// Sets attributes, replaces the old ones of the same names.
  pub fn attrs(mut self, attrs: AttrMap) -> Self {
    self.attrs.extend(attrs);
    self
  }

  /// Appends a region.
  pub fn region(mut self, region: Region) -> Self {
    self.regions.push(region);
    self
  }

  /// Appends regions.
  pub fn regions<I: IntoIterator<Item = Region>>(mut self, regions: I) -> Self {
    self.regions.extend(regions);
    self
  }

  /// Appends a successor block.
  pub fn successor(mut self, block: Block) -> Self {
    self.successors.push(block);
    self
  }

  /// Appends successor blocks.
  pub fn successors<I: IntoIterator<Item = Block>>(mut self, blocks: I) -> Self {
    self.successors.extend(blocks);
    self
  }

  /// Sets the block the new operation will be appended to.
  pub fn parent(mut self, block: Block) -> Self {
    self.parent = Some(block);
    self
  }

  /// Appends a result of the given type.
  pub fn result(mut self, ty: Type) -> Self {
    self.result_types.push(ty);
    self
  }

  /// Appends results of the given types.
  pub fn results<I: IntoIterator<Item = Type>>(mut self, types: I) -> Self {
    self.result_types.extend(types);
    self
  }

  /// Adds traits, a trait that is already present is ignored.
  pub fn traits<I: IntoIterator<Item = OpTrait>>(mut self, traits: I) -> Self {
    for tr in traits {
      if !self.traits.contains(&tr) {
        self.traits.push(tr);
      }
    }
    self
  }

  /// Adds an extra verifier.
  pub fn verifier(mut self, verifier: OpVerifier) -> Self {
    self.verifiers.push(verifier);
    self
  }
}

/// Definition of a kind of operation.
///
/// ```
/// use mlir_core::ir::{traits, AttrMap, DataFlowGraph, OpDef, OpTrait, Type, Value};
///
/// struct Yield;
///
/// impl OpDef for Yield {
///   const NAME: &'static str = "test.yield";
///   const TRAITS: &'static [OpTrait] =
///     &[OpTrait::VariadicOperands, traits::ZERO_RESULTS, OpTrait::Terminator];
///
///   fn create_results(_: &DataFlowGraph, _: &[Value], _: &AttrMap) -> Vec<Type> {
///     Vec::new()
///   }
/// }
///
/// let mut dfg = DataFlowGraph::new();
/// let op = dfg.new_op::<Yield>(vec![], AttrMap::new(), vec![], None).unwrap();
/// assert!(dfg.op(op).is_terminator());
/// ```
pub trait OpDef {
  /// Name of the operation.
  const NAME: &'static str;

  /// Traits the operation is composed with.
  const TRAITS: &'static [OpTrait];

  /// Returns the result types of a new operation.
  ///
  /// Operands passed in are guaranteed to exist in `dfg`.
  fn create_results(dfg: &DataFlowGraph, operands: &[Value], attrs: &AttrMap) -> Vec<Type>;

  /// Returns the extra rules of the operation.
  fn verifiers() -> Vec<OpVerifier> {
    Vec::new()
  }
}

/// A read-only view of an operation, the target of operation rules.
pub struct OpRef<'a> {
  pub dfg: &'a DataFlowGraph,
  pub op: Operation,
  pub data: &'a OperationData,
}

/// A named operation rule.
#[derive(Clone, Copy)]
pub struct OpVerifier {
  pub name: &'static str,
  pub check: fn(&OpRef<'_>) -> Result<(), String>,
}

impl<'a> Rule<OpRef<'a>> for OpVerifier {
  fn name(&self) -> &str {
    self.name
  }

  fn check(&self, target: &OpRef<'a>) -> Result<(), String> {
    (self.check)(target)
  }
}

/// Rule: every operand refers to a live value.
pub(in crate::ir) const OPERANDS_EXIST: OpVerifier = OpVerifier {
  name: "operands-exist",
  check: operands_exist,
};

/// Rule: result owners and indices agree with the result list.
pub(in crate::ir) const RESULTS_OWNED: OpVerifier = OpVerifier {
  name: "results-owned",
  check: results_owned,
};

/// Rule: regions exist, are distinct and belong to no other operation.
pub(in crate::ir) const REGIONS_OWNED: OpVerifier = OpVerifier {
  name: "regions-owned",
  check: regions_owned,
};

/// Rule: successors exist.
pub(in crate::ir) const SUCCESSORS_EXIST: OpVerifier = OpVerifier {
  name: "successors-exist",
  check: successors_exist,
};

/// Rule: the parent block exists and is not nested in the operation.
pub(in crate::ir) const PARENT_ACYCLIC: OpVerifier = OpVerifier {
  name: "parent-acyclic",
  check: parent_acyclic,
};

fn operands_exist(op: &OpRef) -> Result<(), String> {
  for (i, v) in op.data.operands().iter().enumerate() {
    if !op.dfg.values().contains_key(v) {
      return Err(format!(
        "operand #{} of {} refers to value {} that does not exist",
        i,
        op.data.name(),
        v
      ));
    }
  }
  Ok(())
}

fn results_owned(op: &OpRef) -> Result<(), String> {
  for (i, r) in op.data.results().iter().enumerate() {
    let expected = ValueKind::OpResult {
      owner: op.op,
      index: i,
    };
    match op.dfg.values().get(r) {
      Some(data) if *data.kind() == expected => {}
      _ => {
        return Err(format!(
          "result #{} of {} is not owned by it at index {}",
          i,
          op.data.name(),
          i
        ))
      }
    }
  }
  Ok(())
}

fn regions_owned(op: &OpRef) -> Result<(), String> {
  let mut seen = HashSet::new();
  for r in op.data.regions() {
    if !seen.insert(*r) {
      return Err(format!("region {} appears twice in {}", r, op.data.name()));
    }
    match op.dfg.regions().get(r).map(|data| data.parent()) {
      None => return Err(format!("region {} does not exist", r)),
      Some(Some(parent)) if parent != op.op => {
        return Err(format!(
          "region {} is already owned by operation {}",
          r, parent
        ))
      }
      Some(_) => {}
    }
  }
  Ok(())
}

fn successors_exist(op: &OpRef) -> Result<(), String> {
  match op
    .data
    .successors()
    .iter()
    .find(|b| !op.dfg.blocks().contains_key(*b))
  {
    Some(b) => Err(format!("successor block {} does not exist", b)),
    None => Ok(()),
  }
}

fn parent_acyclic(op: &OpRef) -> Result<(), String> {
  match op.data.parent() {
    None => Ok(()),
    Some(b) if !op.dfg.blocks().contains_key(&b) => {
      Err(format!("parent block {} does not exist", b))
    }
    Some(b) if op.dfg.is_block_inside(b, op.data.regions()) => Err(format!(
      "{} can not be placed in block {} of its own regions",
      op.data.name(),
      b
    )),
    Some(_) => Ok(()),
  }
}

/// Returns all rules of the given operation: built-in rules, trait rules
/// and extra verifiers.
pub(in crate::ir) fn op_validator<'a>(data: &OperationData) -> Validator<'a, OpRef<'a>> {
  let mut validator = Validator::new();
  for builtin in [
    OPERANDS_EXIST,
    RESULTS_OWNED,
    REGIONS_OWNED,
    SUCCESSORS_EXIST,
    PARENT_ACYCLIC,
  ] {
    validator.add(builtin);
  }
  for tr in data.traits() {
    validator.add(*tr);
  }
  for verifier in data.verifiers() {
    validator.add(*verifier);
  }
  validator
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::context::Context;
  use crate::ir::traits;

  #[test]
  fn state_builder() {
    let mut ctx = Context::new();
    let ty = Type::get_signless(&mut ctx, 1);
    let name = Attribute::string(&mut ctx, "f");
    let state = OperationState::new("test.op")
      .result(ty.clone())
      .results([ty])
      .attr("sym_name", name)
      .traits([traits::ZERO_OPERANDS, OpTrait::Symbol, traits::ZERO_OPERANDS]);
    assert_eq!(state.name, "test.op");
    assert_eq!(state.result_types.len(), 2);
    assert_eq!(state.traits, vec![traits::ZERO_OPERANDS, OpTrait::Symbol]);
    assert!(state.attrs.contains_key("sym_name"));
  }
}
