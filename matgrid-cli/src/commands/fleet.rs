//! `matgrid fleet` - launch the local compute-worker fleet.

use crate::error::CliError;
use clap::Args;
use matgrid::config::{FleetConfig, DEFAULT_FLEET_SIZE, DEFAULT_WORKER_BASE_PORT};
use matgrid::worker::launch_local_fleet;
use std::net::IpAddr;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Args)]
pub struct FleetArgs {
    /// Host address the workers bind
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// First worker port; the fleet occupies sequential ports from here
    #[arg(long, default_value_t = DEFAULT_WORKER_BASE_PORT)]
    base_port: u16,

    /// Number of configured fleet endpoints
    #[arg(long, default_value_t = DEFAULT_FLEET_SIZE)]
    size: usize,
}

pub async fn run(args: FleetArgs) -> Result<(), CliError> {
    let config = FleetConfig::new(args.host, args.base_port, args.size);
    let shutdown = CancellationToken::new();

    let handle = launch_local_fleet(&config, shutdown.clone())
        .await
        .map_err(CliError::Fleet)?;

    println!(
        "Fleet running: {} workers on {} starting at port {}",
        handle.len(),
        args.host,
        args.base_port
    );
    println!("Press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.map_err(CliError::Fleet)?;
    info!("shutdown requested, stopping fleet");

    handle.stop();
    handle.join().await;
    Ok(())
}
