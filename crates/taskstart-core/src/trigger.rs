use crate::error::TaskStartError;
use crate::repository::Repository;
use crate::task::{ApiResponse, TaskRef};
use tracing::info;

/// Issue the start command. Anything but 204 means the repository refused
/// the request; it is not retried.
pub async fn start(
    repo: &dyn Repository,
    task: &TaskRef,
) -> Result<ApiResponse, TaskStartError> {
    info!("Starting task '{}' ({})", task.name, task.id);
    let response = repo.start_task(&task.id).await?;

    if !response.is_no_content() {
        return Err(TaskStartError::TriggerRejected {
            status: response.status,
            message: response.message,
        });
    }

    info!("Task started, response: {}", response);
    Ok(response)
}
