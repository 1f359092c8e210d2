mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod session;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("tsmeta CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let settings = config::Settings::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Parse(args) => commands::parse::run(args, &settings),
        Commands::Load(args) => commands::load::run(args, &settings),
        Commands::Attach(args) => commands::attach::run(args, &settings),
        Commands::Show(args) => commands::show::run(args, &settings),
        Commands::Shell => commands::shell::run(&settings),
    };

    if let Err(e) = &result {
        error!("Command failed: {}", e);
    }
    result
}
