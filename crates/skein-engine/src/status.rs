//! Instance lifecycle status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a workflow instance.
///
/// `Pending` and `Running` are non-terminal. `Completed`, `Failed` and
/// `Stopped` are terminal: once set, the status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
  Pending,
  Running,
  Completed,
  Failed,
  Stopped,
}

impl InstanceStatus {
  /// Whether this status is final.
  pub const fn is_terminal(&self) -> bool {
    matches!(self, Self::Completed | Self::Failed | Self::Stopped)
  }
}

impl fmt::Display for InstanceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let status = match self {
      Self::Pending => "pending",
      Self::Running => "running",
      Self::Completed => "completed",
      Self::Failed => "failed",
      Self::Stopped => "stopped",
    };
    f.write_str(status)
  }
}
