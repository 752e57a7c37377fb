use clap::Parser;
use std::process::ExitCode;
use taskstart_core::run;
use taskstart_qrs::QrsClient;
use tracing::{error, info, info_span, Instrument};

mod cli;
mod logging;

use cli::{Cli, Settings};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let settings = match cli.resolve(&config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let _guard = match logging::init(&settings.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let run_id = uuid::Uuid::new_v4();
    let code = execute(&settings)
        .instrument(info_span!("run", id = %run_id))
        .await;
    ExitCode::from(code)
}

async fn execute(settings: &Settings) -> u8 {
    info!("Starting qlik-task-start");
    info!("Timeout threshold seconds: {}", settings.run.timeout_seconds);
    info!("Poll frequency in seconds: {}", settings.run.poll_interval_seconds);
    info!("Running task '{}'", settings.run.identifier);
    info!("Hostname = {}", settings.qrs.host_name);
    info!("Certificate path = {}", settings.qrs.certificate_path.display());

    info!("Connecting to QRS API");
    let client = match QrsClient::connect(&settings.qrs) {
        Ok(client) => client,
        Err(e) => {
            error!("QRS API connection failure: {}", e);
            return e.exit_code();
        }
    };

    match run(&client, &settings.run).await {
        Ok(outcome) => {
            info!("Run finished: {}", outcome);
            outcome.exit_code()
        }
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    }
}
