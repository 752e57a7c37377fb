pub mod config;
pub mod error;
pub mod escalation;
pub mod poller;
pub mod repository;
pub mod resolver;
pub mod runner;
pub mod status;
pub mod task;
pub mod trigger;

pub use config::Config;
pub use error::TaskStartError;
pub use poller::{PollOutcome, PollState};
pub use repository::{Repository, TaskFilter};
pub use runner::{run, RunOptions, RunOutcome};
pub use status::{ExecutionStatus, StatusCategory};
pub use task::{ApiResponse, ExecutionFingerprint, TaskId, TaskRecord, TaskRef};
