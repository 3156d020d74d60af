// Jobtrack API server

use std::process::ExitCode;

use jobtrack_app::{init_tracing, start};
use jobtrack_common::{Config, LogFormat};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info", LogFormat::Pretty);
            error!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.rust_log, config.log_format);
    info!("Starting Jobtrack API server");

    match start(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
