//! `matgrid gateway` - serve the HTTP gateway backed by the fleet.

use crate::error::CliError;
use clap::Args;
use matgrid::config::{
    FleetConfig, GatewayConfig, DEFAULT_FLEET_SIZE, DEFAULT_GATEWAY_PORT,
    DEFAULT_WORKER_BASE_PORT,
};
use matgrid::gateway;
use matgrid::service::MatrixService;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

#[derive(Args)]
pub struct GatewayArgs {
    /// Address the gateway binds
    #[arg(long, default_value_t = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_GATEWAY_PORT))]
    bind: SocketAddr,

    /// Host the worker fleet runs on
    #[arg(long, default_value = "127.0.0.1")]
    worker_host: IpAddr,

    /// First worker port
    #[arg(long, default_value_t = DEFAULT_WORKER_BASE_PORT)]
    worker_base_port: u16,

    /// Number of fleet endpoints
    #[arg(long, default_value_t = DEFAULT_FLEET_SIZE)]
    fleet_size: usize,
}

pub async fn run(args: GatewayArgs) -> Result<(), CliError> {
    let fleet = FleetConfig::new(args.worker_host, args.worker_base_port, args.fleet_size);
    let config = GatewayConfig::new(args.bind);

    let service = MatrixService::connect(fleet)
        .await
        .map_err(CliError::ServiceConnect)?;

    println!(
        "Gateway on {} dispatching to {} workers",
        config.bind(),
        service.fleet_size()
    );

    gateway::serve(config.bind(), Arc::new(service))
        .await
        .map_err(CliError::Serve)
}
