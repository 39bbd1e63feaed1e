use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod app;
mod cli;

use slicecost::init_tracing;
use slicecost::util::persistence::ConfigStore;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Cli::parse();
    init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("command failed: {err:?}");
            app::failure_notice(&err).emit();
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Cli) -> Result<()> {
    let store = match args.config {
        Some(path) => ConfigStore::at(path),
        None => ConfigStore::default_location(),
    };

    match args.command {
        cli::Commands::Calc(calc) => app::calc(&store, calc).await,
        cli::Commands::Gcode { file, json } => app::gcode(&file, json).await,
        cli::Commands::Params { action } => app::params(&store, action),
    }
}
