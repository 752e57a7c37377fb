use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use taskstart_core::{Config, RunOptions};
use taskstart_qrs::QrsSettings;

#[derive(Parser, Debug)]
#[command(name = "qlik-task-start")]
#[command(about = "Start a Qlik Sense task and wait for it to finish", long_about = None)]
pub struct Cli {
    /// Task ID, or exact task name
    #[arg(long = "task_id_or_name")]
    pub task_id_or_name: String,

    /// Central node host name (falls back to the config file)
    #[arg(long = "host_name")]
    pub host_name: Option<String>,

    /// Directory holding client.pem and client_key.pem (falls back to the config file)
    #[arg(long = "certificate_path")]
    pub certificate_path: Option<PathBuf>,

    /// Seconds to wait for the task before giving up [default: 60]
    #[arg(long = "timeout_seconds", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: Option<u64>,

    /// Seconds between status checks [default: 10]
    #[arg(long = "poll_frequency", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_frequency: Option<u64>,

    /// Stop the task on timeout when nonzero [default: 0]
    #[arg(long = "kill_task", allow_negative_numbers = true)]
    pub kill_task: Option<i64>,

    /// QRS port [default: 4242]
    #[arg(long = "port")]
    pub port: Option<u16>,

    /// Config file path
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Log file path [default: qlik_task_start.log]
    #[arg(long = "log_file")]
    pub log_file: Option<PathBuf>,
}

/// Everything one run needs, with flags taking precedence over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub run: RunOptions,
    pub qrs: QrsSettings,
    pub log_file: PathBuf,
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Ok(Config::load_from(path)?),
            None => Ok(Config::load_default()?),
        }
    }

    pub fn resolve(self, config: &Config) -> anyhow::Result<Settings> {
        let host_name = self
            .host_name
            .or_else(|| config.host_name.clone())
            .ok_or_else(|| anyhow::anyhow!("--host_name is required"))?;
        let certificate_path = self
            .certificate_path
            .or_else(|| config.certificate_path.clone())
            .ok_or_else(|| anyhow::anyhow!("--certificate_path is required"))?;

        let run = RunOptions {
            identifier: self.task_id_or_name,
            timeout_seconds: self.timeout_seconds.unwrap_or_else(|| config.timeout_seconds()),
            poll_interval_seconds: self.poll_frequency.unwrap_or_else(|| config.poll_frequency()),
            kill_on_timeout: self
                .kill_task
                .map(|k| k != 0)
                .unwrap_or_else(|| config.kill_task()),
        };
        run.validate()?;

        let qrs = QrsSettings {
            host_name,
            port: self.port.unwrap_or_else(|| config.port()),
            certificate_path,
            user_directory: config.user_directory().to_string(),
            user_id: config.user_id().to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_seconds()),
            accept_invalid_certs: config.accept_invalid_certs,
        };

        Ok(Settings {
            run,
            qrs,
            log_file: self.log_file.unwrap_or_else(|| config.log_file()),
        })
    }
}
