use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::edge::Edge;
use crate::error::WorkflowError;
use crate::graph::Graph;
use crate::node::Node;

/// A declarative graph of nodes and conditional edges.
///
/// Nodes are keyed by id; edges keep their insertion order, which is
/// semantically significant: the engine scans them in order and takes the
/// first match. Referential integrity is enforced at insertion time, so a
/// definition that built without error only needs the non-empty check in
/// [`WorkflowDefinition::validate`] before execution. Once handed to the
/// engine the definition is consumed by value and shared read-only.
pub struct WorkflowDefinition {
  nodes: HashMap<String, Arc<dyn Node>>,
  edges: Vec<Edge>,
}

impl WorkflowDefinition {
  pub fn new() -> Self {
    Self {
      nodes: HashMap::new(),
      edges: Vec::new(),
    }
  }

  /// Insert a node.
  ///
  /// # Errors
  /// `InvalidNode` if the node rejects its own validation (empty id),
  /// `DuplicateNode` if a node with the same id is already present.
  pub fn add_node(&mut self, node: impl Node + 'static) -> Result<(), WorkflowError> {
    node.validate()?;

    let node_id = node.id().to_string();
    if self.nodes.contains_key(&node_id) {
      return Err(WorkflowError::DuplicateNode { node_id });
    }

    self.nodes.insert(node_id, Arc::new(node));
    Ok(())
  }

  /// Append an edge.
  ///
  /// # Errors
  /// `DanglingEdge` if either endpoint does not reference a known node.
  pub fn add_edge(&mut self, edge: Edge) -> Result<(), WorkflowError> {
    if !self.nodes.contains_key(edge.source()) || !self.nodes.contains_key(edge.target()) {
      return Err(WorkflowError::DanglingEdge {
        from: edge.source().to_string(),
        to: edge.target().to_string(),
      });
    }

    self.edges.push(edge);
    Ok(())
  }

  /// Check the definition is runnable.
  ///
  /// # Errors
  /// `EmptyGraph` if no nodes have been added. Edge-endpoint integrity is
  /// not re-checked here; it was enforced at [`WorkflowDefinition::add_edge`] time.
  pub fn validate(&self) -> Result<(), WorkflowError> {
    if self.nodes.is_empty() {
      return Err(WorkflowError::EmptyGraph);
    }
    Ok(())
  }

  /// Look up a node by id.
  pub fn node(&self, node_id: &str) -> Option<&Arc<dyn Node>> {
    self.nodes.get(node_id)
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Edges in insertion order.
  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  /// Build the analysis view for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(&self.nodes, &self.edges)
  }
}

impl Default for WorkflowDefinition {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for WorkflowDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WorkflowDefinition")
      .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
      .field("edges", &self.edges)
      .finish()
  }
}
