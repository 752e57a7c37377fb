use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical repository ID of a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stop time of a task's last execution, kept as the raw token the
/// repository returned. Only ever compared for equality: a different value
/// means a new execution has been registered since it was captured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct ExecutionFingerprint(pub String);

impl fmt::Display for ExecutionFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved task: ID plus display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub id: TaskId,
    pub name: String,
}

/// One line of execution detail attached to the last execution result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDetail {
    #[serde(default)]
    pub message: String,
    pub detail_created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub status: i64,
    #[serde(default)]
    pub stop_time: ExecutionFingerprint,
    #[serde(default)]
    pub details: Vec<ExecutionDetail>,
}

impl ExecutionResult {
    /// Details ordered by creation time, oldest first.
    pub fn sorted_details(&self) -> Vec<ExecutionDetail> {
        let mut details = self.details.clone();
        details.sort_by_key(|d| d.detail_created_date);
        details
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Operational {
    pub last_execution_result: ExecutionResult,
}

/// Task record as returned by the repository's `task/full` listing.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub operational: Operational,
}

impl TaskRecord {
    pub fn task_ref(&self) -> TaskRef {
        TaskRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    pub fn last_execution(&self) -> &ExecutionResult {
        &self.operational.last_execution_result
    }

    pub fn fingerprint(&self) -> &ExecutionFingerprint {
        &self.operational.last_execution_result.stop_time
    }

    pub fn status_code(&self) -> i64 {
        self.operational.last_execution_result.status
    }
}

/// Subset of the repository's `about` document logged after connecting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct About {
    #[serde(default)]
    pub build_version: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub database_provider: String,
    #[serde(default)]
    pub node_type: i64,
    #[serde(default)]
    pub shared_persistence: bool,
}

/// Status code and reason phrase of a start or stop command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub message: String,
}

impl ApiResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 204: accepted, processing, no body.
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK_JSON: &str = r#"{
        "id": "a1b2c3d4-1111-2222-3333-444455556666",
        "name": "Nightly Reload",
        "taskType": 0,
        "operational": {
            "id": "9f0c0c9a-0000-0000-0000-000000000000",
            "lastExecutionResult": {
                "status": 7,
                "startTime": "2019-10-01T01:00:00.000Z",
                "stopTime": "2019-10-01T01:05:12.345Z",
                "details": [
                    {"message": "Reload finished", "detailCreatedDate": "2019-10-01T01:05:12.300Z"},
                    {"message": "Changing task state to Started", "detailCreatedDate": "2019-10-01T01:00:00.100Z"}
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_full_task_record() {
        let task: TaskRecord = serde_json::from_str(TASK_JSON).unwrap();
        assert_eq!(task.id.as_str(), "a1b2c3d4-1111-2222-3333-444455556666");
        assert_eq!(task.name, "Nightly Reload");
        assert_eq!(task.status_code(), 7);
        assert_eq!(task.fingerprint().0, "2019-10-01T01:05:12.345Z");
        assert_eq!(task.last_execution().details.len(), 2);
    }

    #[test]
    fn test_sorted_details_ascending() {
        let task: TaskRecord = serde_json::from_str(TASK_JSON).unwrap();
        let messages: Vec<_> = task
            .last_execution()
            .sorted_details()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert_eq!(messages, vec!["Changing task state to Started", "Reload finished"]);
    }

    #[test]
    fn test_never_run_task_has_default_fingerprint() {
        let json = r#"{
            "id": "x", "name": "never",
            "operational": {"lastExecutionResult": {"status": 0}}
        }"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(task.fingerprint(), &ExecutionFingerprint::default());
        assert!(task.last_execution().details.is_empty());
    }

    #[test]
    fn test_api_response_display() {
        let resp = ApiResponse::new(400, "Bad Request");
        assert!(!resp.is_no_content());
        assert_eq!(resp.to_string(), "(400 Bad Request)");
        assert!(ApiResponse::new(204, "No Content").is_no_content());
    }
}
