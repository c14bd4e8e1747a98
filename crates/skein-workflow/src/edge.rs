//! Directed, optionally conditional edges.

use std::fmt;
use std::sync::Arc;

use crate::context::ExecutionContext;

/// Predicate gating edge traversal.
///
/// Must be side-effect free: the engine evaluates conditions while scanning
/// for a successor, and an edge that is scanned is not necessarily taken.
pub type Condition = Arc<dyn Fn(&dyn ExecutionContext) -> bool + Send + Sync>;

/// A directed connection between two nodes.
///
/// An edge with no condition is unconditionally traversable.
#[derive(Clone)]
pub struct Edge {
  source: String,
  target: String,
  condition: Option<Condition>,
}

impl Edge {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
      condition: None,
    }
  }

  /// Gate this edge behind a predicate.
  pub fn with_condition<F>(mut self, condition: F) -> Self
  where
    F: Fn(&dyn ExecutionContext) -> bool + Send + Sync + 'static,
  {
    self.condition = Some(Arc::new(condition));
    self
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  /// The gating predicate, if any.
  pub fn condition(&self) -> Option<&Condition> {
    self.condition.as_ref()
  }

  /// Whether this edge can be taken under the given context.
  pub fn satisfied_by(&self, ctx: &dyn ExecutionContext) -> bool {
    match &self.condition {
      Some(condition) => condition(ctx),
      None => true,
    }
  }
}

impl fmt::Debug for Edge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Edge")
      .field("source", &self.source)
      .field("target", &self.target)
      .field("conditional", &self.condition.is_some())
      .finish()
  }
}
