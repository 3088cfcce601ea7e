//! Clipcast CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clipcast::cli::{
    app::{load_merged_config, run_session, SessionOptions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    catalog_cmd::handle_catalog_command,
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use clipcast::domain::config::AppConfig;
use clipcast::domain::recording::Duration;
use clipcast::infrastructure::XdgConfigStore;

/// Diagnostics go to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "clipcast=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Catalog { json }) => {
            let config = load_merged_config(AppConfig::empty()).await;
            if let Err(e) = handle_catalog_command(&config.catalog(), json, &presenter) {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        mode: cli.mode,
        resolution: cli.resolution,
        duration: cli.duration.clone(),
        frame_rate: cli.frame_rate,
        output_dir: cli.output_dir.clone(),
        progress: if cli.no_progress { Some(false) } else { None },
        ..Default::default()
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Parse duration; none means the interactive toggle loop
    let duration = match config.duration.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => Some(d),
            Err(e) => {
                presenter.error(&format!("Invalid duration: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => None,
    };

    let options = SessionOptions::from_config(&config, duration);
    run_session(config, options).await
}
