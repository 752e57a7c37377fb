//! Fixed mapping from QRS execution status codes to names and categories.

use crate::error::TaskStartError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the poll loop treats a status: keep waiting, or stop with a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Wait,
    Success,
    Error,
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCategory::Wait => write!(f, "Wait"),
            StatusCategory::Success => write!(f, "Success"),
            StatusCategory::Error => write!(f, "Error"),
        }
    }
}

/// Execution status of a task's last run, as reported by the repository.
/// Discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
    NeverStarted = 0,
    Triggered = 1,
    Started = 2,
    Queued = 3,
    AbortInitiated = 4,
    Aborting = 5,
    Aborted = 6,
    FinishedSuccess = 7,
    FinishedFail = 8,
    Skipped = 9,
    Retry = 10,
    Error = 11,
    Reset = 12,
}

impl ExecutionStatus {
    pub const ALL: [ExecutionStatus; 13] = [
        ExecutionStatus::NeverStarted,
        ExecutionStatus::Triggered,
        ExecutionStatus::Started,
        ExecutionStatus::Queued,
        ExecutionStatus::AbortInitiated,
        ExecutionStatus::Aborting,
        ExecutionStatus::Aborted,
        ExecutionStatus::FinishedSuccess,
        ExecutionStatus::FinishedFail,
        ExecutionStatus::Skipped,
        ExecutionStatus::Retry,
        ExecutionStatus::Error,
        ExecutionStatus::Reset,
    ];

    pub fn from_code(code: i64) -> Result<Self, TaskStartError> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(TaskStartError::InvalidStatusCode(code))
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            ExecutionStatus::NeverStarted => "NeverStarted",
            ExecutionStatus::Triggered => "Triggered",
            ExecutionStatus::Started => "Started",
            ExecutionStatus::Queued => "Queued",
            ExecutionStatus::AbortInitiated => "AbortInitiated",
            ExecutionStatus::Aborting => "Aborting",
            ExecutionStatus::Aborted => "Aborted",
            ExecutionStatus::FinishedSuccess => "FinishedSuccess",
            ExecutionStatus::FinishedFail => "FinishedFail",
            ExecutionStatus::Skipped => "Skipped",
            ExecutionStatus::Retry => "Retry",
            ExecutionStatus::Error => "Error",
            ExecutionStatus::Reset => "Reset",
        }
    }

    pub fn category(self) -> StatusCategory {
        use ExecutionStatus::*;
        match self {
            NeverStarted | Triggered | Started | Queued | Retry => StatusCategory::Wait,
            FinishedSuccess => StatusCategory::Success,
            AbortInitiated | Aborting | Aborted | FinishedFail | Skipped | Error | Reset => {
                StatusCategory::Error
            }
        }
    }
}

impl TryFrom<i64> for ExecutionStatus {
    type Error = TaskStartError;

    fn try_from(code: i64) -> Result<Self, TaskStartError> {
        Self::from_code(code)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a raw status code into its name and category.
pub fn classify(code: i64) -> Result<(&'static str, StatusCategory), TaskStartError> {
    let status = ExecutionStatus::from_code(code)?;
    Ok((status.name(), status.category()))
}
