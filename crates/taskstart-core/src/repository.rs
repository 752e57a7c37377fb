use crate::error::TaskStartError;
use crate::task::{About, ApiResponse, TaskId, TaskRecord};
use std::fmt;

/// Server-side filter for the task listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFilter {
    IdEq(TaskId),
    NameEq(String),
}

impl fmt::Display for TaskFilter {
    /// Renders the repository's filter syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFilter::IdEq(id) => write!(f, "id eq {}", id),
            TaskFilter::NameEq(name) => write!(f, "name eq '{}'", name.replace('\'', "''")),
        }
    }
}

/// The remote task repository. One connected session per run, shared
/// read-only by every phase.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// Connectivity check.
    async fn about(&self) -> Result<About, TaskStartError>;

    /// List tasks, optionally filtered server-side.
    async fn list_tasks(
        &self,
        filter: Option<&TaskFilter>,
    ) -> Result<Vec<TaskRecord>, TaskStartError>;

    /// Ask the repository to start a task.
    async fn start_task(&self, task_id: &TaskId) -> Result<ApiResponse, TaskStartError>;

    /// Ask the repository to stop a running task.
    async fn stop_task(&self, task_id: &TaskId) -> Result<ApiResponse, TaskStartError>;

    /// Whether `TaskFilter::NameEq` can be trusted. When false, name lookups
    /// scan the unfiltered listing.
    fn supports_name_filter(&self) -> bool {
        false
    }
}
