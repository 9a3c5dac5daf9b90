mod cli;
mod config;
mod error;
mod logging;
mod runtime;

use clap::Parser;

pub use cli::Cli;
pub use config::AppConfig;
pub use error::AppError;

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(cli.log_directive())?;

    let config = AppConfig::from_env()?;

    tracing::info!(
        username = %config.username,
        base_url = %config.base_url,
        http_timeout_secs = config.http_timeout_secs,
        "easee cli initialized"
    );

    runtime::run(cli, config)
}
