//! Segment Recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;

use segment_recorder::cli::{
    app::{build_record_options, init_tracing, load_merged_config, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    run_session,
};
use segment_recorder::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();
    init_tracing(cli.verbose);

    // Build CLI config from args
    let cli_config = cli.to_config();

    let store = XdgConfigStore::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Merge config
    let config = load_merged_config(&store, cli_config).await;

    let options = match build_record_options(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_session(options).await
}
