use crate::error::TaskStartError;
use crate::runner::{DEFAULT_POLL_FREQUENCY, DEFAULT_TIMEOUT_SECONDS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_QRS_PORT: u16 = 4242;
pub const DEFAULT_LOG_FILE: &str = "qlik_task_start.log";

/// Optional configuration file. Every key may be omitted; command-line
/// flags take precedence over anything set here.
/// Loaded from ~/.config/qlik-task-start/config.yaml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub certificate_path: Option<PathBuf>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user_directory: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub poll_frequency: Option<u64>,
    #[serde(default)]
    pub kill_task: Option<bool>,
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load config from the default path, or an empty config if it is absent.
    pub fn load_default() -> Result<Self, TaskStartError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, TaskStartError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("qlik-task-start")
            .join("config.yaml")
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_QRS_PORT)
    }

    pub fn user_directory(&self) -> &str {
        self.user_directory.as_deref().unwrap_or("INTERNAL")
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or("sa_repository")
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn poll_frequency(&self) -> u64 {
        self.poll_frequency.unwrap_or(DEFAULT_POLL_FREQUENCY)
    }

    pub fn kill_task(&self) -> bool {
        self.kill_task.unwrap_or(false)
    }

    pub fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds.unwrap_or(30)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::default();
        assert_eq!(config.port(), 4242);
        assert_eq!(config.timeout_seconds(), 60);
        assert_eq!(config.poll_frequency(), 10);
        assert!(!config.kill_task());
        assert_eq!(config.user_directory(), "INTERNAL");
        assert_eq!(config.user_id(), "sa_repository");
        assert_eq!(config.log_file(), PathBuf::from("qlik_task_start.log"));
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "host_name: qlik.example.com\n\
             certificate_path: /etc/qlik/certs\n\
             timeout_seconds: 600\n\
             kill_task: true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.host_name.as_deref(), Some("qlik.example.com"));
        assert_eq!(
            config.certificate_path,
            Some(PathBuf::from("/etc/qlik/certs"))
        );
        assert_eq!(config.timeout_seconds(), 600);
        assert_eq!(config.poll_frequency(), 10);
        assert!(config.kill_task());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "timeout_seconds: soon\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(TaskStartError::Yaml(_))
        ));
    }
}
