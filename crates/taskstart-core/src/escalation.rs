use crate::error::TaskStartError;
use crate::repository::Repository;
use crate::runner::RunOutcome;
use crate::task::TaskRef;
use tracing::{error, info, warn};

/// Handle a poll loop that ran out of time. Without `kill` the task is left
/// running and the run counts as a clean give-up; with `kill` the task is
/// stopped and the run fails whatever the stop command returns.
pub async fn on_timeout(
    repo: &dyn Repository,
    task: &TaskRef,
    elapsed_seconds: u64,
    kill: bool,
) -> Result<RunOutcome, TaskStartError> {
    if !kill {
        warn!(
            "TIMEOUT: Task '{}' ({}) failed to complete within {} seconds, task will continue running",
            task.name, task.id, elapsed_seconds
        );
        return Ok(RunOutcome::TimedOut { killed: false });
    }

    error!(
        "TIMEOUT: Task '{}' ({}) failed to complete within {} seconds, killing task",
        task.name, task.id, elapsed_seconds
    );
    let response = repo.stop_task(&task.id).await?;
    if response.is_no_content() {
        info!("Task stopped, response: {}", response);
    } else {
        error!("Task stop failed, response: {}", response);
    }

    Ok(RunOutcome::TimedOut { killed: true })
}
