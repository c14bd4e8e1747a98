//! Node capability and the closure-backed convenience implementation.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::context::ExecutionContext;
use crate::error::WorkflowError;

/// Error reported by a node execution.
///
/// The engine records it on the instance and marks the instance failed.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct NodeError {
  message: String,
}

impl NodeError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// A unit of work in a workflow graph.
///
/// Identity is the id; uniqueness is enforced when the node is inserted
/// into a definition. `execute` is where domain behavior is plugged in;
/// the engine is agnostic to its content and surfaces any reported error
/// as a terminal failure of the instance.
#[async_trait]
pub trait Node: Send + Sync {
  /// Unique, non-empty node id.
  fn id(&self) -> &str;

  /// Type tag describing what kind of work this node performs.
  fn kind(&self) -> &str;

  /// Opaque node configuration.
  fn config(&self) -> &Map<String, Value>;

  /// Check the node is well-formed before insertion.
  fn validate(&self) -> Result<(), WorkflowError> {
    if self.id().is_empty() {
      return Err(WorkflowError::InvalidNode {
        message: "node id cannot be empty".to_string(),
      });
    }
    Ok(())
  }

  /// Execute this node against the bound instance context.
  async fn execute(&self, ctx: &dyn ExecutionContext) -> Result<(), NodeError>;
}

type Handler = Arc<dyn Fn(&dyn ExecutionContext) -> Result<(), NodeError> + Send + Sync>;

/// Closure-backed [`Node`] implementation.
///
/// Covers the common case without a dedicated type per node: an id, a kind
/// tag, a config map, and an optional handler. A handler-less node executes
/// as a no-op, which makes it usable as a pure routing point.
#[derive(Clone)]
pub struct FnNode {
  id: String,
  kind: String,
  config: Map<String, Value>,
  handler: Option<Handler>,
}

impl FnNode {
  pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      kind: kind.into(),
      config: Map::new(),
      handler: None,
    }
  }

  /// Add a configuration entry.
  pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
    self.config.insert(key.into(), value);
    self
  }

  /// Set the execution handler.
  pub fn with_handler<F>(mut self, handler: F) -> Self
  where
    F: Fn(&dyn ExecutionContext) -> Result<(), NodeError> + Send + Sync + 'static,
  {
    self.handler = Some(Arc::new(handler));
    self
  }
}

#[async_trait]
impl Node for FnNode {
  fn id(&self) -> &str {
    &self.id
  }

  fn kind(&self) -> &str {
    &self.kind
  }

  fn config(&self) -> &Map<String, Value> {
    &self.config
  }

  async fn execute(&self, ctx: &dyn ExecutionContext) -> Result<(), NodeError> {
    match &self.handler {
      Some(handler) => handler(ctx),
      None => Ok(()),
    }
  }
}

impl fmt::Debug for FnNode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FnNode")
      .field("id", &self.id)
      .field("kind", &self.kind)
      .field("config", &self.config)
      .field("has_handler", &self.handler.is_some())
      .finish()
  }
}
