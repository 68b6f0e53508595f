//! Configuration for the worker fleet and the HTTP gateway.
//!
//! One concern per struct, defaults matching the reference deployment:
//! eight workers on sequential ports behind a gateway on port 8080.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default worker host.
pub const DEFAULT_WORKER_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// First worker port; the fleet occupies sequential ports from here.
pub const DEFAULT_WORKER_BASE_PORT: u16 = 8081;

/// Default fleet size.
pub const DEFAULT_FLEET_SIZE: usize = 8;

/// Default gateway port.
pub const DEFAULT_GATEWAY_PORT: u16 = 8080;

/// Where the worker fleet lives.
///
/// Either a host with a base port and size (endpoints are the
/// sequential ports from the base), or an explicit endpoint list.
#[derive(Clone, Debug)]
pub struct FleetConfig {
    host: IpAddr,
    base_port: u16,
    size: usize,
    explicit: Option<Vec<SocketAddr>>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WORKER_HOST,
            base_port: DEFAULT_WORKER_BASE_PORT,
            size: DEFAULT_FLEET_SIZE,
            explicit: None,
        }
    }
}

impl FleetConfig {
    /// Fleet on sequential ports starting at `base_port`.
    pub fn new(host: IpAddr, base_port: u16, size: usize) -> Self {
        Self {
            host,
            base_port,
            size,
            explicit: None,
        }
    }

    /// Fleet at exactly the given endpoints.
    pub fn from_endpoints(endpoints: Vec<SocketAddr>) -> Self {
        Self {
            host: DEFAULT_WORKER_HOST,
            base_port: DEFAULT_WORKER_BASE_PORT,
            size: endpoints.len(),
            explicit: Some(endpoints),
        }
    }

    /// Replaces the worker host.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Replaces the base port.
    pub fn with_base_port(mut self, base_port: u16) -> Self {
        self.base_port = base_port;
        self
    }

    /// Replaces the fleet size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Number of workers in the fleet.
    pub fn size(&self) -> usize {
        match &self.explicit {
            Some(endpoints) => endpoints.len(),
            None => self.size,
        }
    }

    /// The fleet's endpoints, in worker-id order.
    pub fn endpoints(&self) -> Vec<SocketAddr> {
        match &self.explicit {
            Some(endpoints) => endpoints.clone(),
            None => (0..self.size)
                .map(|i| SocketAddr::new(self.host, self.base_port + i as u16))
                .collect(),
        }
    }
}

/// Where the HTTP gateway listens.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    bind: SocketAddr,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(DEFAULT_WORKER_HOST, DEFAULT_GATEWAY_PORT),
        }
    }
}

impl GatewayConfig {
    /// Gateway bound to the given address.
    pub fn new(bind: SocketAddr) -> Self {
        Self { bind }
    }

    /// Replaces the bind address.
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// The address the gateway binds.
    pub fn bind(&self) -> SocketAddr {
        self.bind
    }
}
