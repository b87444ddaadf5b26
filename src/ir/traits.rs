//! Operation traits ([`OpTrait`]), the reusable structural constraints
//! an operation is composed with.

use crate::ir::builder::OpRef;
use crate::ir::entities::Operation;
use crate::validator::Rule;
use std::collections::HashMap;

/// Symbol table of an operation carrying [`OpTrait::SymbolTable`],
/// maps symbol names to the operations that define them.
pub type SymbolTable = HashMap<String, Operation>;

/// A structural constraint of operations.
///
/// Traits are plain values: the same constraint built twice compares
/// equal, so an operation can be queried for a trait with `==`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpTrait {
  /// Exactly `n` operands.
  NOperands(usize),
  /// Any number of operands.
  VariadicOperands,
  /// Exactly `n` results.
  NResults(usize),
  /// Any number of results.
  VariadicResults,
  /// Exactly `n` regions.
  NRegions(usize),
  /// Defines a symbol, requires a string attribute `sym_name`.
  Symbol,
  /// Holds a table of the symbols defined under the operation.
  SymbolTable,
  /// Ends a block, and names the successors of the block.
  Terminator,
}

pub const ZERO_OPERANDS: OpTrait = n_operands(0);
pub const ONE_OPERAND: OpTrait = n_operands(1);
pub const TWO_OPERANDS: OpTrait = n_operands(2);
pub const ZERO_RESULTS: OpTrait = n_results(0);
pub const ONE_RESULT: OpTrait = n_results(1);
pub const TWO_RESULTS: OpTrait = n_results(2);
pub const ZERO_REGIONS: OpTrait = n_regions(0);
pub const ONE_REGION: OpTrait = n_regions(1);
pub const TWO_REGIONS: OpTrait = n_regions(2);

/// Returns the trait that requires exactly `n` operands.
pub const fn n_operands(n: usize) -> OpTrait {
  OpTrait::NOperands(n)
}

/// Returns the trait that requires exactly `n` results.
pub const fn n_results(n: usize) -> OpTrait {
  OpTrait::NResults(n)
}

/// Returns the trait that requires exactly `n` regions.
pub const fn n_regions(n: usize) -> OpTrait {
  OpTrait::NRegions(n)
}

impl OpTrait {
  /// Name of the attribute that holds the symbol name.
  pub const SYM_NAME: &'static str = "sym_name";

  fn exactly(op: &OpRef, n: usize, what: &str, got: usize) -> Result<(), String> {
    if got == n {
      Ok(())
    } else {
      Err(format!(
        "{} requires exactly {} {}, but got {}",
        op.data.name(),
        n,
        what,
        got
      ))
    }
  }
}

impl<'a> Rule<OpRef<'a>> for OpTrait {
  fn name(&self) -> &str {
    match self {
      OpTrait::NOperands(..) => "n-operands",
      OpTrait::VariadicOperands => "variadic-operands",
      OpTrait::NResults(..) => "n-results",
      OpTrait::VariadicResults => "variadic-results",
      OpTrait::NRegions(..) => "n-regions",
      OpTrait::Symbol => "symbol",
      OpTrait::SymbolTable => "symbol-table",
      OpTrait::Terminator => "terminator",
    }
  }

  fn check(&self, op: &OpRef<'a>) -> Result<(), String> {
    let data = op.data;
    match *self {
      OpTrait::NOperands(n) => Self::exactly(op, n, "operands", data.operands().len()),
      OpTrait::NResults(n) => Self::exactly(op, n, "results", data.results().len()),
      OpTrait::NRegions(n) => Self::exactly(op, n, "regions", data.regions().len()),
      OpTrait::Symbol => match data.attr(Self::SYM_NAME) {
        Some(attr) if attr.as_str().is_some() => Ok(()),
        Some(_) => Err(format!(
          "{} requires attribute `{}` to be a string",
          data.name(),
          Self::SYM_NAME
        )),
        None => Err(format!(
          "{} requires attribute `{}`",
          data.name(),
          Self::SYM_NAME
        )),
      },
      OpTrait::VariadicOperands
      | OpTrait::VariadicResults
      | OpTrait::SymbolTable
      | OpTrait::Terminator => Ok(()),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn factories_are_stable() {
    assert_eq!(n_operands(3), n_operands(3));
    assert_ne!(n_operands(3), n_operands(4));
    assert_ne!(n_operands(1), n_results(1));
    assert_eq!(ONE_REGION, n_regions(1));
    assert_eq!(ZERO_OPERANDS, OpTrait::NOperands(0));
  }

  #[test]
  fn rule_names() {
    assert_eq!(Rule::<OpRef>::name(&TWO_RESULTS), "n-results");
    assert_eq!(Rule::<OpRef>::name(&OpTrait::Terminator), "terminator");
  }
}
