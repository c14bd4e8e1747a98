//! Error types for the execution engine.

use skein_workflow::WorkflowError;
use thiserror::Error;

/// Errors returned by engine operations or recorded on an instance.
///
/// `InvalidDefinition`, `NotFound` and `AlreadyFinished` are returned
/// synchronously by the facade. `NoStartNode` and `NodeExecution` happen on
/// the traversal task after `start_workflow` has already returned; they are
/// recorded on the instance and surfaced through polling.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
  /// The submitted definition failed validation.
  #[error("invalid workflow definition: {0}")]
  InvalidDefinition(#[from] WorkflowError),

  /// No instance is registered under the given id.
  #[error("workflow instance not found: {instance_id}")]
  NotFound { instance_id: String },

  /// The instance already reached a terminal status.
  #[error("workflow instance already finished: {instance_id}")]
  AlreadyFinished { instance_id: String },

  /// The graph has no zero-in-degree node to start from.
  #[error("no start node found in workflow")]
  NoStartNode,

  /// A node execution reported an error.
  #[error("node '{node_id}' failed: {message}")]
  NodeExecution { node_id: String, message: String },
}
