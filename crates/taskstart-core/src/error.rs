use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskStartError {
    #[error("QRS API connection failure: {0}")]
    Connection(String),

    #[error("Task ID or name '{0}' not found")]
    NotFound(String),

    #[error("Task start failed, response: ({status} {message})")]
    TriggerRejected { status: u16, message: String },

    #[error("Invalid task execution status code: {0}")]
    InvalidStatusCode(i64),

    #[error("QRS API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TaskStartError {
    /// Every error is terminal for the run.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
