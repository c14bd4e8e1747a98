//! Skein workflow definitions.
//!
//! This crate provides the declarative half of skein: a workflow is a graph
//! of nodes connected by directed, optionally conditional edges.
//!
//! Key pieces:
//! - [`Node`]: the capability a unit of work implements (identity, type tag,
//!   opaque config, validation, and an async execution operation)
//! - [`FnNode`]: a closure-backed [`Node`] for the common case
//! - [`Edge`] and [`Condition`]: directed connections, optionally gated by a
//!   side-effect-free predicate
//! - [`WorkflowDefinition`]: the builder enforcing referential integrity at
//!   insertion time
//! - [`Graph`]: the analysis view used to pick an entry point
//! - [`ExecutionContext`]: the per-instance view handed to node and
//!   condition logic by the execution engine

mod context;
mod edge;
mod error;
mod graph;
mod node;
mod workflow;

pub use context::ExecutionContext;
pub use edge::{Condition, Edge};
pub use error::WorkflowError;
pub use graph::Graph;
pub use node::{FnNode, Node, NodeError};
pub use workflow::WorkflowDefinition;
