//! Concrete execution context bound to one instance.

use std::collections::HashMap;

use serde_json::Value;
use skein_workflow::ExecutionContext;

use crate::instance::WorkflowInstance;

/// [`ExecutionContext`] implementation over a live workflow instance.
///
/// One per traversal task. Node handlers and edge conditions receive it by
/// reference; only the active traversal step writes through it.
pub(crate) struct InstanceContext<'a> {
  instance: &'a WorkflowInstance,
}

impl<'a> InstanceContext<'a> {
  pub(crate) fn new(instance: &'a WorkflowInstance) -> Self {
    Self { instance }
  }
}

impl ExecutionContext for InstanceContext<'_> {
  fn instance_id(&self) -> &str {
    self.instance.id()
  }

  fn current_node(&self) -> String {
    self.instance.current_node()
  }

  fn state(&self) -> HashMap<String, Value> {
    self.instance.state()
  }

  fn state_value(&self, key: &str) -> Option<Value> {
    self.instance.state_value(key)
  }

  fn set_state(&self, key: &str, value: Value) {
    self.instance.set_state(key, value);
  }
}
