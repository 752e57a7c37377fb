use crate::error::TaskStartError;
use crate::escalation;
use crate::poller::{self, PollOutcome, PollState};
use crate::repository::Repository;
use crate::resolver;
use crate::task::About;
use crate::trigger;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_POLL_FREQUENCY: u64 = 10;

/// Parameters for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    pub identifier: String,
    pub timeout_seconds: u64,
    pub poll_interval_seconds: u64,
    pub kill_on_timeout: bool,
}

impl RunOptions {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            poll_interval_seconds: DEFAULT_POLL_FREQUENCY,
            kill_on_timeout: false,
        }
    }

    pub fn validate(&self) -> Result<(), TaskStartError> {
        if self.identifier.is_empty() {
            return Err(TaskStartError::Config(
                "task ID or name must not be empty".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(TaskStartError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.poll_interval_seconds == 0 {
            return Err(TaskStartError::Config(
                "poll_frequency must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Final result of a run that did not error out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed,
    TimedOut { killed: bool },
}

impl RunOutcome {
    /// Process exit code. A timeout is only a failure when the task was killed.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Succeeded => 0,
            RunOutcome::Failed => 1,
            RunOutcome::TimedOut { killed: false } => 0,
            RunOutcome::TimedOut { killed: true } => 1,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Succeeded => write!(f, "succeeded"),
            RunOutcome::Failed => write!(f, "failed"),
            RunOutcome::TimedOut { killed: false } => write!(f, "timed_out"),
            RunOutcome::TimedOut { killed: true } => write!(f, "timed_out_killed"),
        }
    }
}

/// Connectivity check. Any failure is reported as a connection error.
pub async fn check_connection(repo: &dyn Repository) -> Result<About, TaskStartError> {
    let about = repo.about().await.map_err(|e| match e {
        TaskStartError::Connection(_) => e,
        other => TaskStartError::Connection(other.to_string()),
    })?;
    info!(
        "Connected to QRS API (build {}, database {})",
        about.build_version, about.database_provider
    );
    Ok(about)
}

/// Connect, resolve, trigger, poll and, on timeout, escalate.
pub async fn run(
    repo: &dyn Repository,
    options: &RunOptions,
) -> Result<RunOutcome, TaskStartError> {
    options.validate()?;
    check_connection(repo).await?;

    let resolved = resolver::resolve(repo, &options.identifier).await?;
    trigger::start(repo, &resolved.task).await?;

    let state = PollState::new(
        resolved.task.id.clone(),
        resolved.last_execution.clone(),
        options.timeout_seconds,
        options.poll_interval_seconds,
    );
    let report = poller::poll(repo, &resolved.task, state).await?;

    match report.outcome {
        PollOutcome::Success { .. } => Ok(RunOutcome::Succeeded),
        PollOutcome::Error { .. } => Ok(RunOutcome::Failed),
        PollOutcome::TimedOut {
            task,
            elapsed_seconds,
        } => {
            escalation::on_timeout(repo, &task, elapsed_seconds, options.kill_on_timeout).await
        }
    }
}
