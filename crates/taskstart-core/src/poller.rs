//! Poll loop: samples the task until its new execution finishes or the
//! timeout budget is spent.

use crate::error::TaskStartError;
use crate::repository::{Repository, TaskFilter};
use crate::status::{ExecutionStatus, StatusCategory};
use crate::task::{ExecutionDetail, ExecutionFingerprint, TaskId, TaskRecord, TaskRef};
use std::time::Duration;
use tracing::{error, info};

/// Mutable state of one poll loop.
#[derive(Debug, Clone)]
pub struct PollState {
    pub task_id: TaskId,
    pub last_execution: ExecutionFingerprint,
    pub elapsed_seconds: u64,
    pub timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    pub iterations: u32,
}

impl PollState {
    pub fn new(
        task_id: TaskId,
        last_execution: ExecutionFingerprint,
        timeout_seconds: u64,
        poll_interval_seconds: u64,
    ) -> Self {
        Self {
            task_id,
            last_execution,
            elapsed_seconds: 0,
            timeout_seconds,
            poll_interval_seconds,
            iterations: 0,
        }
    }

    /// Checked at loop entry only, so the iteration that crosses the
    /// threshold still completes.
    pub fn has_time_left(&self) -> bool {
        self.elapsed_seconds < self.timeout_seconds
    }

    /// Elapsed time advances by the nominal interval, not wall-clock time.
    pub fn advance(&mut self) {
        self.elapsed_seconds += self.poll_interval_seconds;
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// What a single sample of the task tells us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Last execution record has not rotated yet; its status belongs to the
    /// previous run and is ignored.
    NotStarted,
    Status(ExecutionStatus),
}

impl Observation {
    pub fn category(&self) -> StatusCategory {
        match self {
            Observation::NotStarted => StatusCategory::Wait,
            Observation::Status(status) => status.category(),
        }
    }
}

/// Classify a freshly fetched record against the fingerprint captured
/// before triggering.
pub fn observe(
    last_execution: &ExecutionFingerprint,
    record: &TaskRecord,
) -> Result<Observation, TaskStartError> {
    if record.fingerprint() == last_execution {
        return Ok(Observation::NotStarted);
    }
    Ok(Observation::Status(ExecutionStatus::from_code(
        record.status_code(),
    )?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Success {
        task: TaskRef,
        status: ExecutionStatus,
        details: Vec<ExecutionDetail>,
    },
    Error {
        task: TaskRef,
        status: ExecutionStatus,
        details: Vec<ExecutionDetail>,
    },
    TimedOut {
        task: TaskRef,
        elapsed_seconds: u64,
    },
}

#[derive(Debug, Clone)]
pub struct PollReport {
    pub outcome: PollOutcome,
    pub state: PollState,
}

async fn fetch(repo: &dyn Repository, task_id: &TaskId) -> Result<TaskRecord, TaskStartError> {
    let filter = TaskFilter::IdEq(task_id.clone());
    repo.list_tasks(Some(&filter))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| TaskStartError::NotFound(task_id.to_string()))
}

/// Run the poll loop until a terminal outcome.
pub async fn poll(
    repo: &dyn Repository,
    task: &TaskRef,
    mut state: PollState,
) -> Result<PollReport, TaskStartError> {
    let mut task = task.clone();

    while state.has_time_left() {
        let record = fetch(repo, &state.task_id).await?;
        task = record.task_ref();
        state.iterations += 1;

        match observe(&state.last_execution, &record)? {
            Observation::NotStarted => {
                info!(
                    "WAIT: Task '{}' ({}) not started yet, waiting {} seconds",
                    task.name, task.id, state.poll_interval_seconds
                );
            }
            Observation::Status(status) => match status.category() {
                StatusCategory::Error => {
                    let details = record.last_execution().sorted_details();
                    for detail in &details {
                        error!("Task execution detail: '{}'", detail.message);
                    }
                    error!(
                        "ERROR: Task '{}' ({}) finished with status {}",
                        task.name, task.id, status
                    );
                    return Ok(PollReport {
                        outcome: PollOutcome::Error {
                            task,
                            status,
                            details,
                        },
                        state,
                    });
                }
                StatusCategory::Success => {
                    let details = record.last_execution().sorted_details();
                    for detail in &details {
                        info!("Task execution detail: '{}'", detail.message);
                    }
                    info!(
                        "SUCCESS: Task '{}' ({}) finished with status {}",
                        task.name, task.id, status
                    );
                    return Ok(PollReport {
                        outcome: PollOutcome::Success {
                            task,
                            status,
                            details,
                        },
                        state,
                    });
                }
                StatusCategory::Wait => {
                    info!(
                        "WAIT: Task '{}' ({}) current status {}, {} seconds elapsed",
                        task.name, task.id, status, state.elapsed_seconds
                    );
                }
            },
        }

        state.advance();
        tokio::time::sleep(state.poll_interval()).await;
    }

    Ok(PollReport {
        outcome: PollOutcome::TimedOut {
            task,
            elapsed_seconds: state.elapsed_seconds,
        },
        state,
    })
}
