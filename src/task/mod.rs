//! Background task tracking
//!
//! Generation jobs run in the background; callers poll their state through
//! a task store keyed by UUID. Records move Queued -> Running -> terminal
//! and never leave a terminal state.

pub mod coordinator;
pub mod store;

pub use coordinator::{CoordinatorConfig, TaskCoordinator};
pub use store::TaskStore;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to a generation task
pub type TaskId = Uuid;

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Running,
    Complete,
    Error,
}

impl TaskStatus {
    /// Terminal states are never overwritten by later updates
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Complete | TaskStatus::Error)
    }
}

/// Snapshot of a task, as serialized to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub status: TaskStatus,
    pub percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskRecord {
    /// Record for a task accepted but not yet picked up
    pub fn queued() -> Self {
        Self {
            status: TaskStatus::Queued,
            percent: 0,
            stage: None,
            audio_url: None,
            error: None,
        }
    }

    /// In-progress record carrying the current stage label
    pub fn running(stage: impl Into<String>, percent: u8) -> Self {
        Self {
            status: TaskStatus::Running,
            percent: percent.min(100),
            stage: Some(stage.into()),
            audio_url: None,
            error: None,
        }
    }

    /// Successful completion pointing at the finished artifact
    pub fn complete(audio_url: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Complete,
            percent: 100,
            stage: None,
            audio_url: Some(audio_url.into()),
            error: None,
        }
    }

    /// Failed completion carrying the error message. Percent resets to 0
    /// so clients never render a failed task as finished.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Error,
            percent: 0,
            stage: None,
            audio_url: None,
            error: Some(message.into()),
        }
    }
}
