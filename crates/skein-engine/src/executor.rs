//! Graph traversal for a single workflow instance.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::context::InstanceContext;
use crate::error::EngineError;
use crate::instance::WorkflowInstance;
use crate::status::InstanceStatus;

/// Drive one instance from launch to a terminal status.
///
/// Runs as its own task. The only external influence is a stop request,
/// observed at each loop boundary; an in-flight node execution is never
/// interrupted.
pub(crate) async fn run(instance: Arc<WorkflowInstance>) {
  if !instance.mark_running() {
    // Stopped before this task got scheduled.
    debug!(instance_id = %instance.id(), "instance no longer pending, skipping traversal");
    return;
  }

  info!(
    instance_id = %instance.id(),
    node_count = instance.definition().node_count(),
    edge_count = instance.definition().edges().len(),
    "workflow instance started"
  );

  let Some(start_node) = resolve_start_node(&instance) else {
    error!(instance_id = %instance.id(), "no start node found");
    instance.fail(EngineError::NoStartNode);
    return;
  };

  instance.set_current_node(&start_node);
  debug!(instance_id = %instance.id(), node_id = %start_node, "entry node resolved");

  let definition = instance.definition().clone();
  let ctx = InstanceContext::new(&instance);
  let mut current = start_node;

  loop {
    if instance.status() == InstanceStatus::Stopped {
      warn!(instance_id = %instance.id(), "instance stopped externally");
      return;
    }

    // Node handlers may never await, so yield once per step to keep stop
    // requests and status pollers from starving on a busy graph.
    tokio::task::yield_now().await;

    let Some(node) = definition.node(&current).cloned() else {
      // Edge targets are checked at insertion; this can only be a bad
      // resume id.
      instance.fail(EngineError::NodeExecution {
        node_id: current.clone(),
        message: "node not present in definition".to_string(),
      });
      return;
    };

    debug!(
      instance_id = %instance.id(),
      node_id = %current,
      kind = %node.kind(),
      "executing node"
    );

    if let Err(err) = node.execute(&ctx).await {
      error!(
        instance_id = %instance.id(),
        node_id = %current,
        error = %err,
        "node execution failed"
      );
      instance.fail(EngineError::NodeExecution {
        node_id: current.clone(),
        message: err.to_string(),
      });
      return;
    }

    // First satisfiable edge in insertion order wins; no fan-out.
    let next = definition
      .edges()
      .iter()
      .find(|edge| edge.source() == current && edge.satisfied_by(&ctx))
      .map(|edge| edge.target().to_string());

    match next {
      Some(target) => {
        debug!(instance_id = %instance.id(), from = %current, to = %target, "edge taken");
        instance.set_current_node(&target);
        current = target;
      }
      None => {
        info!(instance_id = %instance.id(), node_id = %current, "workflow instance completed");
        instance.complete();
        return;
      }
    }
  }
}

/// Resume from a previously set current node, otherwise pick the first
/// entry point in lexicographic order.
fn resolve_start_node(instance: &WorkflowInstance) -> Option<String> {
  let resumed = instance.current_node();
  if !resumed.is_empty() {
    return Some(resumed);
  }

  instance.definition().graph().entry_points().first().cloned()
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use serde_json::json;
  use skein_workflow::{Edge, FnNode, WorkflowDefinition};

  use super::*;

  fn marker_node(id: &str) -> FnNode {
    let key = format!("visited_{id}");
    FnNode::new(id, "marker").with_handler(move |ctx| {
      ctx.set_state(&key, json!(true));
      Ok(())
    })
  }

  fn chain_definition() -> WorkflowDefinition {
    let mut definition = WorkflowDefinition::new();
    definition.add_node(marker_node("a")).unwrap();
    definition.add_node(marker_node("b")).unwrap();
    definition.add_node(marker_node("c")).unwrap();
    definition.add_edge(Edge::new("a", "b")).unwrap();
    definition.add_edge(Edge::new("b", "c")).unwrap();
    definition
  }

  #[tokio::test]
  async fn traversal_visits_the_whole_chain() {
    let instance = Arc::new(WorkflowInstance::new(
      Arc::new(chain_definition()),
      HashMap::new(),
    ));

    run(instance.clone()).await;

    assert_eq!(instance.status(), InstanceStatus::Completed);
    assert_eq!(instance.current_node(), "c");
    assert_eq!(instance.state_value("visited_a"), Some(json!(true)));
    assert_eq!(instance.state_value("visited_b"), Some(json!(true)));
    assert_eq!(instance.state_value("visited_c"), Some(json!(true)));
  }

  #[tokio::test]
  async fn traversal_resumes_from_a_preset_node() {
    let instance = Arc::new(WorkflowInstance::new(
      Arc::new(chain_definition()),
      HashMap::new(),
    ));
    instance.set_current_node("b");

    run(instance.clone()).await;

    assert_eq!(instance.status(), InstanceStatus::Completed);
    assert_eq!(instance.state_value("visited_a"), None);
    assert_eq!(instance.state_value("visited_b"), Some(json!(true)));
    assert_eq!(instance.state_value("visited_c"), Some(json!(true)));
  }

  #[tokio::test]
  async fn traversal_fails_on_unknown_resume_node() {
    let instance = Arc::new(WorkflowInstance::new(
      Arc::new(chain_definition()),
      HashMap::new(),
    ));
    instance.set_current_node("ghost");

    run(instance.clone()).await;

    assert_eq!(instance.status(), InstanceStatus::Failed);
    assert!(matches!(
      instance.error(),
      Some(EngineError::NodeExecution { node_id, .. }) if node_id == "ghost"
    ));
  }

  #[tokio::test]
  async fn stopped_instance_is_not_run() {
    let instance = Arc::new(WorkflowInstance::new(
      Arc::new(chain_definition()),
      HashMap::new(),
    ));
    instance.request_stop().expect("stop failed");

    run(instance.clone()).await;

    assert_eq!(instance.status(), InstanceStatus::Stopped);
    assert!(instance.state().is_empty());
  }
}
