//! CLI error handling with user-friendly messages.

use matgrid::service::ServiceError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to launch the worker fleet
    Fleet(std::io::Error),
    /// Failed to connect the service to the fleet
    ServiceConnect(ServiceError),
    /// Gateway server error
    Serve(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::ServiceConnect(_) = self {
            eprintln!();
            eprintln!("Is the worker fleet running? Start it with: matgrid fleet");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Fleet(e) => write!(f, "Failed to launch worker fleet: {}", e),
            CliError::ServiceConnect(e) => write!(f, "Failed to connect to the fleet: {}", e),
            CliError::Serve(e) => write!(f, "Gateway server error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Fleet(e) => Some(e),
            CliError::ServiceConnect(e) => Some(e),
            CliError::Serve(e) => Some(e),
            CliError::LoggingInit(_) => None,
        }
    }
}
