//! Matgrid CLI - Command-line interface
//!
//! This binary launches the two halves of a matgrid deployment: the
//! local compute-worker fleet and the HTTP gateway in front of the
//! dispatch engine.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use matgrid::logging::{default_log_dir, default_log_file, init_logging};

#[derive(Parser)]
#[command(name = "matgrid", version = matgrid::VERSION)]
#[command(about = "Deadline-scaled distributed matrix multiplication", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Launch the local compute-worker fleet
    Fleet(commands::fleet::FleetArgs),
    /// Serve the HTTP gateway backed by the worker fleet
    Gateway(commands::gateway::GatewayArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _guard = match init_logging(default_log_dir(), default_log_file()) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let result = match cli.command {
        Command::Fleet(args) => commands::fleet::run(args).await,
        Command::Gateway(args) => commands::gateway::run(args).await,
    };

    if let Err(e) = result {
        e.exit();
    }
}
