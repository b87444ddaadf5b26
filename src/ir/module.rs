//! The module container ([`ModuleOp`]), the root operation that
//! top-level operations are attached to.

use crate::error::Result;
use crate::ir::attrs::AttrMap;
use crate::ir::builder::OpDef;
use crate::ir::dfg::DataFlowGraph;
use crate::ir::entities::{Block, Operation, Value};
use crate::ir::traits::{OpTrait, ONE_REGION, ZERO_OPERANDS, ZERO_RESULTS};
use crate::ir::types::Type;
use crate::validator::ValidationError;

/// Definition of the `builtin.module` operation.
///
/// A module has no operands, no results and exactly one region, and
/// holds the symbol table of its top-level operations.
pub struct ModuleOp;

impl OpDef for ModuleOp {
  const NAME: &'static str = "builtin.module";
  const TRAITS: &'static [OpTrait] = &[
    ZERO_OPERANDS,
    ZERO_RESULTS,
    ONE_REGION,
    OpTrait::SymbolTable,
  ];

  fn create_results(_: &DataFlowGraph, _: &[Value], _: &AttrMap) -> Vec<Type> {
    Vec::new()
  }
}

impl ModuleOp {
  /// Builds a new module with one empty region.
  pub fn build(dfg: &mut DataFlowGraph) -> std::result::Result<Operation, ValidationError> {
    let region = dfg.new_region();
    let module = dfg.new_op::<Self>(Vec::new(), AttrMap::new(), vec![region], None);
    if module.is_err() {
      dfg.regions.remove(&region);
    }
    module
  }

  /// Returns the body block of the module, if it has been created.
  ///
  /// # Panics
  ///
  /// Panics if the given operation does not exist.
  pub fn body(dfg: &DataFlowGraph, module: Operation) -> Option<Block> {
    dfg.region(dfg.op(module).region(0)?).front()
  }

  /// Returns the body block of the module, creates it if it does not
  /// exist.
  ///
  /// # Panics
  ///
  /// Panics if the given operation does not exist or has no region.
  pub fn body_or_create(dfg: &mut DataFlowGraph, module: Operation) -> Result<Block> {
    if let Some(block) = Self::body(dfg, module) {
      return Ok(block);
    }
    let region = dfg.op(module).region(0).expect("module has no region");
    let block = dfg.new_block();
    dfg.push_block_back(region, block)?;
    Ok(block)
  }

  /// Appends a top-level operation to the body of the module, and
  /// registers it in the symbol table if it defines a symbol.
  ///
  /// Nothing is changed on failure.
  ///
  /// # Panics
  ///
  /// Panics if any of the given operations does not exist.
  pub fn append(dfg: &mut DataFlowGraph, module: Operation, op: Operation) -> Result<()> {
    let body = Self::body_or_create(dfg, module)?;
    let symbol = dfg.op(op).has_trait(OpTrait::Symbol);
    if symbol {
      dfg.insert_symbol(module, op)?;
    }
    if let Err(e) = dfg.push_op_back(body, op) {
      if let Some(name) = dfg.op(op).sym_name().filter(|_| symbol) {
        let name = name.to_string();
        dfg.remove_symbol(module, &name)?;
      }
      return Err(e.into());
    }
    Ok(())
  }
}
