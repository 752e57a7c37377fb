#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use taskstart_core::task::{
    About, ExecutionDetail, ExecutionResult, Operational,
};
use taskstart_core::{
    ApiResponse, ExecutionFingerprint, Repository, TaskFilter, TaskId, TaskRecord, TaskStartError,
};

pub const TASK_ID: &str = "a1b2c3d4-1111-2222-3333-444455556666";
pub const OTHER_ID: &str = "0f0f0f0f-aaaa-bbbb-cccc-ddddeeeeffff";
pub const BEFORE: &str = "2019-10-01T01:05:12.345Z";
pub const AFTER: &str = "2019-10-02T01:07:40.120Z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    About,
    List(Option<TaskFilter>),
    Start(TaskId),
    Stop(TaskId),
}

pub fn detail(message: &str, created: &str) -> ExecutionDetail {
    ExecutionDetail {
        message: message.to_string(),
        detail_created_date: created.parse::<DateTime<Utc>>().unwrap(),
    }
}

pub fn task(id: &str, name: &str, status: i64, stop_time: &str) -> TaskRecord {
    TaskRecord {
        id: TaskId::from_string(id.to_string()),
        name: name.to_string(),
        operational: Operational {
            last_execution_result: ExecutionResult {
                status,
                stop_time: ExecutionFingerprint(stop_time.to_string()),
                details: Vec::new(),
            },
        },
    }
}

pub fn with_details(mut record: TaskRecord, details: Vec<ExecutionDetail>) -> TaskRecord {
    record.operational.last_execution_result.details = details;
    record
}

/// In-memory repository that replays a scripted sequence of task records
/// once the task has been started.
pub struct ScriptedRepository {
    catalog: Vec<TaskRecord>,
    polls: Mutex<VecDeque<TaskRecord>>,
    last_polled: Mutex<Option<TaskRecord>>,
    start_response: ApiResponse,
    stop_response: ApiResponse,
    about_error: Option<String>,
    name_filter: bool,
    started: AtomicBool,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRepository {
    pub fn new(catalog: Vec<TaskRecord>) -> Self {
        Self {
            catalog,
            polls: Mutex::new(VecDeque::new()),
            last_polled: Mutex::new(None),
            start_response: ApiResponse::new(204, "No Content"),
            stop_response: ApiResponse::new(204, "No Content"),
            about_error: None,
            name_filter: false,
            started: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Records returned by successive polls. When exhausted the last one
    /// repeats; with none scripted the catalog record repeats.
    pub fn with_polls(self, polls: Vec<TaskRecord>) -> Self {
        *self.polls.lock().unwrap() = polls.into();
        self
    }

    pub fn with_start_response(mut self, status: u16, message: &str) -> Self {
        self.start_response = ApiResponse::new(status, message);
        self
    }

    pub fn with_stop_response(mut self, status: u16, message: &str) -> Self {
        self.stop_response = ApiResponse::new(status, message);
        self
    }

    pub fn with_about_error(mut self, message: &str) -> Self {
        self.about_error = Some(message.to_string());
        self
    }

    pub fn with_name_filter(mut self) -> Self {
        self.name_filter = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        let calls = self.calls();
        let start = calls
            .iter()
            .position(|c| matches!(c, Call::Start(_)))
            .unwrap_or(calls.len());
        calls[start..]
            .iter()
            .filter(|c| matches!(c, Call::List(_)))
            .count()
    }

    pub fn stop_called(&self) -> bool {
        self.calls().iter().any(|c| matches!(c, Call::Stop(_)))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_poll(&self, id: &TaskId) -> Vec<TaskRecord> {
        let mut last = self.last_polled.lock().unwrap();
        if let Some(next) = self.polls.lock().unwrap().pop_front() {
            *last = Some(next);
        }
        match last.as_ref() {
            Some(record) => vec![record.clone()],
            None => self.catalog.iter().filter(|t| &t.id == id).cloned().collect(),
        }
    }
}

#[async_trait::async_trait]
impl Repository for ScriptedRepository {
    async fn about(&self) -> Result<About, TaskStartError> {
        self.record(Call::About);
        match &self.about_error {
            Some(message) => Err(TaskStartError::Api(message.clone())),
            None => Ok(About {
                build_version: "19.1.3.0".into(),
                database_provider: "Devart.Data.PostgreSql".into(),
                ..About::default()
            }),
        }
    }

    async fn list_tasks(
        &self,
        filter: Option<&TaskFilter>,
    ) -> Result<Vec<TaskRecord>, TaskStartError> {
        self.record(Call::List(filter.cloned()));
        match filter {
            None => Ok(self.catalog.clone()),
            Some(TaskFilter::NameEq(name)) => Ok(self
                .catalog
                .iter()
                .filter(|t| &t.name == name)
                .cloned()
                .collect()),
            Some(TaskFilter::IdEq(id)) => {
                if self.started.load(Ordering::SeqCst) {
                    Ok(self.next_poll(id))
                } else {
                    Ok(self.catalog.iter().filter(|t| &t.id == id).cloned().collect())
                }
            }
        }
    }

    async fn start_task(&self, task_id: &TaskId) -> Result<ApiResponse, TaskStartError> {
        self.record(Call::Start(task_id.clone()));
        self.started.store(true, Ordering::SeqCst);
        Ok(self.start_response.clone())
    }

    async fn stop_task(&self, task_id: &TaskId) -> Result<ApiResponse, TaskStartError> {
        self.record(Call::Stop(task_id.clone()));
        Ok(self.stop_response.clone())
    }

    fn supports_name_filter(&self) -> bool {
        self.name_filter
    }
}
