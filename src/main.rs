use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use dormlink::{
    app::{load_config, AppState},
    cli::{handle_command, handle_local_command, Cli},
    constants::UNREACHABLE_NOTICE,
    utils::init_logger,
    DormError,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logger(cli.verbose);

    match run(cli).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            // Transport failures get the uniform notice, everything else its own message
            match err.downcast_ref::<DormError>() {
                Some(e) if e.is_transport() => {
                    eprintln!("{} {}", "[ERROR]".red(), UNREACHABLE_NOTICE)
                }
                _ => eprintln!("{} {:#}", "[ERROR]".red(), err),
            }
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    if let Some(done) = handle_local_command(&cli.command)? {
        return Ok(done);
    }

    // Load configuration and wire the stores
    let config = load_config(cli.config.as_deref())?;
    let state = AppState::bootstrap(config)?;

    handle_command(&state, cli.command).await
}
