//! In-memory IR: operations, blocks, regions, values and their
//! use-def chains.
//!
//! Every entity lives in a [`DataFlowGraph`] and is referred to by a
//! copyable handle ([`Operation`], [`Block`], [`Region`], [`Value`]).
//! Types and attributes are interned by a [`Context`](crate::Context).
//!
//! # Example
//!
//! ```
//! use mlir_core::ir::{verify, DataFlowGraph, ModuleOp, OperationState, OpTrait};
//!
//! let mut dfg = DataFlowGraph::new();
//! let module = ModuleOp::build(&mut dfg).unwrap();
//! let ret = dfg
//!   .create_operation(OperationState::new("test.return").traits([OpTrait::Terminator]))
//!   .unwrap();
//! ModuleOp::append(&mut dfg, module, ret).unwrap();
//!
//! let body = ModuleOp::body(&dfg, module).unwrap();
//! assert_eq!(dfg.terminator(body), Some(ret));
//! assert!(verify(&dfg, module).is_ok());
//! ```

pub mod attrs;
pub mod builder;
pub mod dfg;
pub mod entities;
pub mod layout;
pub mod module;
pub mod traits;
pub mod types;

mod block;
mod idman;
mod region;
#[cfg(test)]
mod testing;
mod verify;

pub use attrs::{AttrMap, AttrValue, Attribute};
pub use builder::{OpDef, OpRef, OpVerifier, OperationState};
pub use dfg::DataFlowGraph;
pub use entities::{
  Block, BlockData, OpOperand, Operation, OperationData, Region, RegionData, Value, ValueData,
  ValueKind,
};
pub use module::ModuleOp;
pub use traits::{OpTrait, SymbolTable};
pub use types::{FloatKind, Signedness, Type, TypeKind};
pub use verify::{verify, verify_and_log};
