//! Workflow instance record.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};
use serde_json::Value;
use skein_workflow::WorkflowDefinition;

use crate::error::EngineError;
use crate::status::InstanceStatus;

/// Fields mutated during execution, guarded together.
///
/// The registry lock does not serialize writes inside an already-retrieved
/// instance, so the instance carries its own guard: the owning traversal
/// task and an external stop request can race on `status`.
#[derive(Debug)]
struct Lifecycle {
  status: InstanceStatus,
  current_node: String,
  finished_at: Option<DateTime<Utc>>,
  error: Option<EngineError>,
}

/// One execution of a workflow definition.
///
/// Created by the engine at start. Mutated by its own traversal task, with
/// one exception: the stop transition may arrive from any caller. The
/// registry retains instances until process exit, so a finished instance
/// stays inspectable forever (terminal status, state bag and, for
/// failures, the recorded error).
pub struct WorkflowInstance {
  id: String,
  definition: Arc<WorkflowDefinition>,
  started_at: DateTime<Utc>,
  lifecycle: Mutex<Lifecycle>,
  state: RwLock<HashMap<String, Value>>,
}

impl WorkflowInstance {
  pub(crate) fn new(
    definition: Arc<WorkflowDefinition>,
    initial_state: HashMap<String, Value>,
  ) -> Self {
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      definition,
      started_at: Utc::now(),
      lifecycle: Mutex::new(Lifecycle {
        status: InstanceStatus::Pending,
        current_node: String::new(),
        finished_at: None,
        error: None,
      }),
      state: RwLock::new(initial_state),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn definition(&self) -> &Arc<WorkflowDefinition> {
    &self.definition
  }

  pub fn status(&self) -> InstanceStatus {
    self.lifecycle().status
  }

  /// The node the traversal is currently at (empty until one is chosen).
  pub fn current_node(&self) -> String {
    self.lifecycle().current_node.clone()
  }

  pub fn started_at(&self) -> DateTime<Utc> {
    self.started_at
  }

  /// When the instance reached a terminal status.
  pub fn finished_at(&self) -> Option<DateTime<Utc>> {
    self.lifecycle().finished_at
  }

  /// The terminal error, for failed instances.
  pub fn error(&self) -> Option<EngineError> {
    self.lifecycle().error.clone()
  }

  /// Snapshot of the state bag.
  pub fn state(&self) -> HashMap<String, Value> {
    self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
  }

  /// Read a single state key.
  pub fn state_value(&self, key: &str) -> Option<Value> {
    self
      .state
      .read()
      .unwrap_or_else(|e| e.into_inner())
      .get(key)
      .cloned()
  }

  pub(crate) fn set_state(&self, key: impl Into<String>, value: Value) {
    self
      .state
      .write()
      .unwrap_or_else(|e| e.into_inner())
      .insert(key.into(), value);
  }

  pub(crate) fn set_current_node(&self, node_id: &str) {
    self.lifecycle().current_node = node_id.to_string();
  }

  /// `Pending` → `Running`. Returns false when the instance was stopped
  /// before its traversal task got scheduled.
  pub(crate) fn mark_running(&self) -> bool {
    let mut lifecycle = self.lifecycle();
    if lifecycle.status != InstanceStatus::Pending {
      return false;
    }
    lifecycle.status = InstanceStatus::Running;
    true
  }

  /// Terminal transition to `Completed`. A no-op once terminal, so a stop
  /// that landed mid-execution is never overwritten.
  pub(crate) fn complete(&self) -> bool {
    self.finish(InstanceStatus::Completed, None)
  }

  /// Terminal transition to `Failed`, recording the error. A no-op once
  /// terminal.
  pub(crate) fn fail(&self, error: EngineError) -> bool {
    self.finish(InstanceStatus::Failed, Some(error))
  }

  /// Terminal transition to `Stopped`.
  ///
  /// # Errors
  /// `AlreadyFinished` if the instance is already terminal.
  pub(crate) fn request_stop(&self) -> Result<(), EngineError> {
    let mut lifecycle = self.lifecycle();
    if lifecycle.status.is_terminal() {
      return Err(EngineError::AlreadyFinished {
        instance_id: self.id.clone(),
      });
    }
    lifecycle.status = InstanceStatus::Stopped;
    lifecycle.finished_at = Some(Utc::now());
    Ok(())
  }

  fn finish(&self, status: InstanceStatus, error: Option<EngineError>) -> bool {
    let mut lifecycle = self.lifecycle();
    if lifecycle.status.is_terminal() {
      return false;
    }
    lifecycle.status = status;
    lifecycle.finished_at = Some(Utc::now());
    lifecycle.error = error;
    true
  }

  fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
    self.lifecycle.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl fmt::Debug for WorkflowInstance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lifecycle = self.lifecycle();
    f.debug_struct("WorkflowInstance")
      .field("id", &self.id)
      .field("status", &lifecycle.status)
      .field("current_node", &lifecycle.current_node)
      .field("started_at", &self.started_at)
      .field("finished_at", &lifecycle.finished_at)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;
  use std::sync::Arc;

  use skein_workflow::{FnNode, WorkflowDefinition};

  use super::*;

  fn test_instance() -> WorkflowInstance {
    let mut definition = WorkflowDefinition::new();
    definition.add_node(FnNode::new("only", "task")).unwrap();
    WorkflowInstance::new(Arc::new(definition), HashMap::new())
  }

  #[test]
  fn fresh_instance_is_pending() {
    let instance = test_instance();

    assert_eq!(instance.status(), InstanceStatus::Pending);
    assert!(instance.current_node().is_empty());
    assert!(instance.finished_at().is_none());
    assert!(instance.error().is_none());
  }

  #[test]
  fn terminal_status_is_never_overwritten() {
    let instance = test_instance();
    assert!(instance.mark_running());
    instance.request_stop().expect("stop failed");

    // The traversal finishing after a stop must not resurrect the instance.
    assert!(!instance.complete());
    assert!(!instance.fail(EngineError::NoStartNode));
    assert_eq!(instance.status(), InstanceStatus::Stopped);
    assert!(instance.error().is_none());
  }

  #[test]
  fn stop_before_launch_wins_over_mark_running() {
    let instance = test_instance();
    instance.request_stop().expect("stop failed");

    assert!(!instance.mark_running());
    assert_eq!(instance.status(), InstanceStatus::Stopped);
  }

  #[test]
  fn second_stop_reports_already_finished() {
    let instance = test_instance();
    instance.request_stop().expect("first stop failed");

    let result = instance.request_stop();
    assert!(matches!(result, Err(EngineError::AlreadyFinished { .. })));
  }

  #[test]
  fn fail_records_the_error() {
    let instance = test_instance();
    instance.mark_running();
    instance.fail(EngineError::NoStartNode);

    assert_eq!(instance.status(), InstanceStatus::Failed);
    assert!(matches!(instance.error(), Some(EngineError::NoStartNode)));
    assert!(instance.finished_at().is_some());
  }
}
