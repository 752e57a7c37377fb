use crate::error::TaskStartError;
use crate::repository::{Repository, TaskFilter};
use crate::task::{ExecutionFingerprint, TaskId, TaskRecord, TaskRef};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

fn task_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new("[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("task id pattern is valid")
    })
}

/// True when the identifier contains a lowercase task ID anywhere in it.
pub fn looks_like_task_id(identifier: &str) -> bool {
    task_id_pattern().is_match(identifier)
}

/// First task ID embedded in the identifier, if any.
pub fn extract_task_id(identifier: &str) -> Option<TaskId> {
    task_id_pattern()
        .find(identifier)
        .map(|m| TaskId::from_string(m.as_str().to_string()))
}

/// A task resolved before triggering, with the fingerprint of its last
/// execution at that moment.
#[derive(Debug, Clone)]
pub struct ResolvedTask {
    pub task: TaskRef,
    pub last_execution: ExecutionFingerprint,
}

impl ResolvedTask {
    fn from_record(record: &TaskRecord) -> Self {
        Self {
            task: record.task_ref(),
            last_execution: record.fingerprint().clone(),
        }
    }
}

/// Map an ID or display name onto a task and its current fingerprint.
pub async fn resolve(
    repo: &dyn Repository,
    identifier: &str,
) -> Result<ResolvedTask, TaskStartError> {
    let found = if let Some(task_id) = extract_task_id(identifier) {
        debug!("Resolving '{}' by task ID {}", identifier, task_id);
        let filter = TaskFilter::IdEq(task_id);
        let tasks = repo.list_tasks(Some(&filter)).await?;
        tasks.first().map(ResolvedTask::from_record)
    } else if repo.supports_name_filter() {
        debug!("Resolving '{}' by server-side name filter", identifier);
        let filter = TaskFilter::NameEq(identifier.to_string());
        let tasks = repo.list_tasks(Some(&filter)).await?;
        first_named(&tasks, identifier)
    } else {
        debug!("Resolving '{}' by scanning all tasks", identifier);
        let tasks = repo.list_tasks(None).await?;
        first_named(&tasks, identifier)
    };

    let resolved = found.ok_or_else(|| TaskStartError::NotFound(identifier.to_string()))?;
    info!("Last task execution: {}", resolved.last_execution);
    Ok(resolved)
}

fn first_named(tasks: &[TaskRecord], name: &str) -> Option<ResolvedTask> {
    tasks
        .iter()
        .find(|t| t.name == name)
        .map(ResolvedTask::from_record)
}
