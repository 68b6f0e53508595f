//! Local fleet launcher.
//!
//! Starts one worker server per execution unit, bounded by the
//! configured endpoint list. When the machine offers more execution
//! units than endpoints, the count clamps to the endpoint list length;
//! the fleet configuration is the authoritative capacity bound.

use super::WorkerServer;
use crate::config::FleetConfig;
use std::io;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Execution-unit count assumed when the machine will not say.
pub const FALLBACK_EXECUTION_UNITS: usize = 4;

/// Handle over a running local fleet.
pub struct FleetHandle {
    addrs: Vec<SocketAddr>,
    tasks: Vec<JoinHandle<io::Result<()>>>,
    shutdown: CancellationToken,
}

impl FleetHandle {
    /// Addresses the workers actually bound, in worker-id order.
    pub fn addrs(&self) -> &[SocketAddr] {
        &self.addrs
    }

    /// Number of workers launched.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// True when no workers were launched.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Signals every worker to stop accepting connections.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Waits for all worker servers to exit.
    pub async fn join(self) {
        for task in self.tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "worker server exited with error"),
                Err(e) => warn!(error = %e, "worker server task panicked"),
            }
        }
    }
}

/// Launches one worker per execution unit, bounded by the endpoint list.
///
/// All listeners are bound before any worker starts serving, so a
/// port conflict surfaces immediately instead of after a partial start.
pub async fn launch_local_fleet(
    config: &FleetConfig,
    shutdown: CancellationToken,
) -> io::Result<FleetHandle> {
    let endpoints = config.endpoints();
    let units = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_EXECUTION_UNITS);

    let count = if units > endpoints.len() {
        warn!(
            units,
            endpoints = endpoints.len(),
            "more execution units than configured endpoints, clamping worker count"
        );
        endpoints.len()
    } else {
        units
    };

    let mut servers = Vec::with_capacity(count);
    let mut addrs = Vec::with_capacity(count);
    for (id, addr) in endpoints.iter().take(count).enumerate() {
        let server = WorkerServer::bind(id, *addr).await?;
        addrs.push(server.local_addr()?);
        servers.push(server);
    }

    let mut tasks = Vec::with_capacity(count);
    for server in servers {
        let token = shutdown.clone();
        tasks.push(tokio::spawn(server.serve(token)));
    }

    info!(workers = count, "local fleet started");

    Ok(FleetHandle {
        addrs,
        tasks,
        shutdown,
    })
}
