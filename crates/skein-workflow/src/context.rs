//! Execution context contract.

use std::collections::HashMap;

use serde_json::Value;

/// Per-instance view handed to node execution and edge conditions.
///
/// A context is bound to exactly one workflow instance. Only the traversal
/// step currently driving that instance should write through it; the
/// contract is single-writer-per-step, not concurrent mutation.
pub trait ExecutionContext: Send + Sync {
  /// Id of the workflow instance this context is bound to.
  fn instance_id(&self) -> &str;

  /// Id of the node currently being executed.
  fn current_node(&self) -> String;

  /// Snapshot of the full state bag.
  fn state(&self) -> HashMap<String, Value>;

  /// Read a single state key.
  fn state_value(&self, key: &str) -> Option<Value>;

  /// Write a single state key.
  fn set_state(&self, key: &str, value: Value);
}
