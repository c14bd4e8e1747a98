use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum WorkflowError {
  #[error("invalid node: {message}")]
  InvalidNode { message: String },

  #[error("node already exists: {node_id}")]
  DuplicateNode { node_id: String },

  #[error("edge references unknown node: from={from}, to={to}")]
  DanglingEdge { from: String, to: String },

  #[error("workflow must contain at least one node")]
  EmptyGraph,
}
