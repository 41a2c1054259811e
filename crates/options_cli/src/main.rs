use std::io;

use clap::{Parser, Subcommand};
use options_cli::commands::{check_cmd, check_cmd::CheckArgs, dump_cmd, source_args::SourceArgs};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// optionsctl: Inspect layered options and the contracts bound to them
#[derive(Parser, Debug)]
#[command(name = "optionsctl")]
#[command(about = "Inspect layered options and the contracts bound to them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the merged option map with the origin of every key
    Dump(SourceArgs),

    /// Materialize the contracts in a contract file and report their values
    Check(CheckArgs),

    /// Show the CLI version
    Version,
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_env("OPTIONS_LOG"))
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();
    match &cli.command {
        Commands::Dump(args) => {
            if let Err(e) = dump_cmd::execute(args, &mut stdout) {
                error!("Error: {e}");
                std::process::exit(2);
            }
        }
        Commands::Check(args) => match check_cmd::execute(args, &mut stdout) {
            Ok(true) => std::process::exit(0),
            Ok(false) => std::process::exit(1),
            Err(e) => {
                error!("Error: {e}");
                std::process::exit(2);
            }
        },
        Commands::Version => {
            println!("optionsctl version {}", env!("CARGO_PKG_VERSION"));
        }
    }
}
