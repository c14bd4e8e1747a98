//! Engine facade and instance registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use skein_workflow::WorkflowDefinition;
use tracing::info;

use crate::error::EngineError;
use crate::executor;
use crate::instance::WorkflowInstance;
use crate::status::InstanceStatus;

/// The process-wide workflow engine.
///
/// Owns the id → instance registry. Every started workflow runs on its own
/// task and touches the engine only through its instance record; the
/// registry lock covers insertion and lookup, while each instance guards
/// its own mutable fields. Finished instances are retained until process
/// exit.
pub struct WorkflowEngine {
  instances: RwLock<HashMap<String, Arc<WorkflowInstance>>>,
}

impl WorkflowEngine {
  /// Create a new engine with an empty registry.
  pub fn new() -> Self {
    Self {
      instances: RwLock::new(HashMap::new()),
    }
  }

  /// Validate a definition, register a fresh instance for it, and launch
  /// its traversal task.
  ///
  /// Returns the instance id without waiting for execution to proceed;
  /// runtime failures are recorded on the instance, never returned here.
  ///
  /// # Errors
  /// `InvalidDefinition` when the definition fails validation.
  pub fn start_workflow(
    &self,
    definition: WorkflowDefinition,
    initial_state: HashMap<String, Value>,
  ) -> Result<String, EngineError> {
    definition.validate()?;

    let instance = Arc::new(WorkflowInstance::new(Arc::new(definition), initial_state));
    let instance_id = instance.id().to_string();

    {
      let mut instances = self.instances.write().unwrap_or_else(|e| e.into_inner());
      instances.insert(instance_id.clone(), instance.clone());
    }

    info!(instance_id = %instance_id, "workflow instance registered");
    tokio::spawn(executor::run(instance));

    Ok(instance_id)
  }

  /// Request an instance to stop.
  ///
  /// Advisory: flips the status and stamps the end time; the traversal
  /// task observes the flip at its next loop boundary, so an in-flight
  /// node execution is not interrupted.
  ///
  /// # Errors
  /// `NotFound` for unknown ids, `AlreadyFinished` when the instance is
  /// already terminal.
  pub fn stop_workflow(&self, instance_id: &str) -> Result<(), EngineError> {
    let instance = self.lookup(instance_id)?;
    instance.request_stop()?;

    info!(instance_id = %instance_id, "workflow instance stopped");
    Ok(())
  }

  /// Current status of an instance.
  ///
  /// # Errors
  /// `NotFound` for unknown ids.
  pub fn status(&self, instance_id: &str) -> Result<InstanceStatus, EngineError> {
    Ok(self.lookup(instance_id)?.status())
  }

  /// Handle to an instance record, for state and error inspection.
  pub fn instance(&self, instance_id: &str) -> Option<Arc<WorkflowInstance>> {
    let instances = self.instances.read().unwrap_or_else(|e| e.into_inner());
    instances.get(instance_id).cloned()
  }

  fn lookup(&self, instance_id: &str) -> Result<Arc<WorkflowInstance>, EngineError> {
    self.instance(instance_id).ok_or_else(|| EngineError::NotFound {
      instance_id: instance_id.to_string(),
    })
  }
}

impl Default for WorkflowEngine {
  fn default() -> Self {
    Self::new()
  }
}
