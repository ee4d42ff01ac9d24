//! Command-line interface: argument parsing, dispatch and output.

pub mod commands;
pub mod output;
pub mod types;

use anyhow::Result;

pub use types::{Cli, Commands};

use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl, SecretScrubber};

/// Load configuration, install logging and run the selected subcommand.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }

    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match cli.command {
        Commands::Check(args) => commands::check::execute(args, config, cli.json).await,
        Commands::History(args) => commands::history::execute(args, config, cli.json).await,
    }
}

/// Report a failed command and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let message = SecretScrubber::new().scrub_message(&format!("{err:#}"));
    tracing::error!(error = %message, "command failed");

    if json_mode {
        println!("{}", serde_json::json!({ "success": false, "error": message }));
    } else {
        eprintln!("Error: {message}");
    }
    std::process::exit(1);
}
