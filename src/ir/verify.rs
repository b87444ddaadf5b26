//! Verification of operations and everything nested under them.
//!
//! Construction already checks each new operation. After arbitrary
//! edits, [`verify`] walks a whole subtree and re-checks the structural
//! invariants, collecting every failure in one pass.

use crate::diag;
use crate::ir::builder::{op_validator, OpRef};
use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::{Block, OpOperand, Operation, Region, Value, ValueKind};
use crate::ir::traits::OpTrait;
use crate::validator::{RuleFailure, ValidationError};

/// Verifies the given operation and everything nested under it.
///
/// # Panics
///
/// Panics if the given operation does not exist.
pub fn verify(dfg: &DataFlowGraph, op: Operation) -> Result<(), ValidationError> {
  let mut verifier = Verifier {
    dfg,
    failures: Vec::new(),
  };
  verifier.verify_op(op);
  ValidationError::from_failures(verifier.failures).map_or(Ok(()), Err)
}

/// Verifies the given operation, and logs every failure.
/// Returns `true` if the verification passed.
///
/// # Panics
///
/// Panics if the given operation does not exist.
pub fn verify_and_log(dfg: &DataFlowGraph, op: Operation) -> bool {
  match verify(dfg, op) {
    Ok(()) => true,
    Err(e) => {
      for failure in e.failures() {
        diag::log_error(&format!("[{}] {}", failure.rule, failure.message));
      }
      false
    }
  }
}

struct Verifier<'a> {
  dfg: &'a DataFlowGraph,
  failures: Vec<RuleFailure>,
}

impl<'a> Verifier<'a> {
  fn fail(&mut self, rule: &str, message: String) {
    self.failures.push(RuleFailure {
      rule: rule.into(),
      message,
    });
  }

  fn verify_op(&mut self, op: Operation) {
    let dfg = self.dfg;
    let data = dfg.op(op);
    let target = OpRef { dfg, op, data };
    self.failures.extend(op_validator(data).collect(&target));

    if let Some(parent) = data.parent() {
      let listed = dfg
        .blocks()
        .get(&parent)
        .map_or(false, |b| b.ops().contains_key(&op));
      if !listed {
        self.fail(
          "op-parent",
          format!("{} {} is not listed in its parent block {}", data.name(), op, parent),
        );
      }
    }
    for (index, v) in data.operands().iter().enumerate() {
      let registered = dfg
        .values()
        .get(v)
        .map_or(true, |d| d.uses().contains(&OpOperand { owner: op, index }));
      if !registered {
        self.fail(
          "use-list",
          format!(
            "operand #{} of {} is missing from the use list of {}",
            index,
            data.name(),
            v
          ),
        );
      }
    }
    for r in data.results() {
      self.verify_uses(*r);
    }
    for r in data.regions() {
      self.verify_region(op, *r);
    }
    if let Some(table) = data.symbol_table() {
      for (name, sym) in table {
        match dfg.ops().get(sym) {
          None => self.fail(
            "symbol-table",
            format!("symbol `{}` refers to operation {} that does not exist", name, sym),
          ),
          Some(d) if !d.has_trait(OpTrait::Symbol) || d.sym_name() != Some(name.as_str()) => {
            self.fail(
              "symbol-table",
              format!("symbol `{}` is not defined by operation {}", name, sym),
            )
          }
          Some(_) => {}
        }
      }
    }
  }

  fn verify_region(&mut self, op: Operation, region: Region) {
    let dfg = self.dfg;
    let data = match dfg.regions().get(&region) {
      Some(data) => data,
      None => return,
    };
    if data.parent() != Some(op) {
      self.fail(
        "region-parent",
        format!("region {} of {} does not point back to it", region, op),
      );
    }
    for block in data.blocks().keys() {
      self.verify_block(region, *block);
    }
  }

  fn verify_block(&mut self, region: Region, block: Block) {
    let dfg = self.dfg;
    let data = dfg.block(block);
    if data.owner() != Some(region) {
      self.fail(
        "block-owner",
        format!("block {} of region {} does not point back to it", block, region),
      );
    }
    for (i, arg) in data.arguments().iter().enumerate() {
      let expected = ValueKind::BlockArgument {
        owner: Some(block),
        index: Some(i),
      };
      if *dfg.value(*arg).kind() != expected {
        self.fail(
          "argument-index",
          format!("argument #{} of block {} has a wrong owner or index", i, block),
        );
      }
      self.verify_uses(*arg);
    }
    let last = data.back();
    for op in data.ops().keys() {
      let op_data = dfg.op(*op);
      if op_data.parent() != Some(block) {
        self.fail(
          "op-parent",
          format!("{} {} in block {} does not point back to it", op_data.name(), op, block),
        );
      }
      if op_data.is_terminator() && Some(*op) != last {
        self.fail(
          "terminator-last",
          format!(
            "terminator {} must be the last operation of block {}",
            op_data.name(),
            block
          ),
        );
      }
      self.verify_op(*op);
    }
  }

  /// Checks that every use of the value refers back to it.
  fn verify_uses(&mut self, value: Value) {
    let dfg = self.dfg;
    for u in dfg.value(value).uses() {
      let refers = dfg
        .ops()
        .get(&u.owner)
        .and_then(|d| d.operand(u.index))
        .map_or(false, |v| v == value);
      if !refers {
        self.fail(
          "use-list",
          format!(
            "use of {} at operand #{} of {} does not refer to it",
            value, u.index, u.owner
          ),
        );
      }
    }
  }
}
