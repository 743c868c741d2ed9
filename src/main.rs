//! PodPolish CLI entry point

use std::process::ExitCode;

use clap::Parser;

use podpolish::cli::{
    app::{load_merged_config, run_process, ProcessOptions, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging,
    presenter::Presenter,
};
use podpolish::domain::config::AppConfig;
use podpolish::domain::upload::{Language, ProcessingMode};
use podpolish::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let presenter = Presenter::new();
    let store = XdgConfigStore::new();

    if let Some(Commands::Config { action }) = cli.command {
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        server_url: cli.server_url.clone(),
        mode: cli.mode.map(|m| ProcessingMode::from(m).to_string()),
        language: cli.language.map(|l| Language::from(l).to_string()),
        output_dir: cli
            .output_dir
            .as_ref()
            .map(|d| d.to_string_lossy().to_string()),
        timeout_secs: cli.timeout,
    };

    // Merge config
    let config = load_merged_config(&store, cli_config).await;

    let options = ProcessOptions::from_config(&config, cli.file, cli.media_type, !cli.no_download);
    run_process(options).await
}
