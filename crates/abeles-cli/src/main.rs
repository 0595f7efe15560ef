mod cli;
mod commands;
mod config;
mod error;
mod logging;

use crate::cli::{Cli, Commands};
use crate::config::{CliOverrides, PartialRunConfig};
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

    std::panic::set_hook(Box::new(|info| {
        error!("{}", info);
    }));

    info!("🚀 abeles CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let partial_config = match &cli.config {
        Some(path) => PartialRunConfig::from_file(path)?,
        None => PartialRunConfig::default(),
    };
    let overrides = CliOverrides {
        threads: cli.threads,
        quad_order: match &cli.command {
            Commands::Reflect(args) => args.quad_order.as_deref(),
            _ => None,
        },
        points: match &cli.command {
            Commands::Profile(args) => args.points,
            _ => None,
        },
    };
    let settings = partial_config.merge_with_cli(&overrides)?;
    debug!("Resolved run settings: {:?}", &settings);

    let command_result = match cli.command {
        Commands::Reflect(args) => {
            info!("Dispatching to 'reflect' command.");
            commands::reflect::run(args, &settings)
        }
        Commands::Profile(args) => {
            info!("Dispatching to 'profile' command.");
            commands::profile::run(args, &settings)
        }
        Commands::Convert(args) => {
            info!("Dispatching to 'convert' command.");
            commands::convert::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
