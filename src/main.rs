//! mp3rec CLI entry point

use std::process::ExitCode;

use clap::Parser;

use mp3rec::cli::{
    app::{load_merged_config, run_record, RecordOptions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
};
use mp3rec::domain::config::AppConfig;
use mp3rec::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        output: cli.output,
        sample_rate: cli.sample_rate,
        bitrate: cli.bitrate,
        quality: cli.quality,
        max_duration: cli.duration,
        device: cli.device,
    };

    let config = load_merged_config(cli_config).await;

    let options = match RecordOptions::from_config(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_record(options).await
}
