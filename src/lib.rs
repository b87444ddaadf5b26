//! In-memory core of a multi-level intermediate representation.
//!
//! The crate provides a graph of operations, values, blocks and regions
//! connected by use-def edges and structural ownership, and a
//! [`Context`] that interns types and attributes.
//!
//! * [`ir`]: entities, construction, edits and verification.
//! * [`validator`]: composable validation, every failure is collected
//!   into one [`ValidationError`](validator::ValidationError).
//! * [`context`]: interning tables of types and attributes.
//! * [`diag`]: diagnostic logger.
//!
//! # Example
//!
//! ```
//! use mlir_core::ir::{Attribute, DataFlowGraph, OperationState, Type};
//! use mlir_core::Context;
//!
//! let mut ctx = Context::new();
//! let mut dfg = DataFlowGraph::new();
//! let i32_ty = Type::get_signless(&mut ctx, 32);
//! let one = Attribute::integer(&mut ctx, i32_ty.clone(), 1).unwrap();
//! let konst = dfg
//!   .create_operation(OperationState::new("arith.constant").attr("value", one).result(i32_ty))
//!   .unwrap();
//! let v = dfg.op(konst).results()[0];
//! assert!(dfg.value(v).use_empty());
//! ```

pub mod context;
pub mod diag;
pub mod error;
pub mod ir;
pub mod validator;

pub use context::Context;
pub use error::{Error, Result};
