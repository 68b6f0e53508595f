//! Service facade: wires the fleet channels, the selection pool, and
//! the dispatch engine behind one connect/shutdown lifecycle.

mod error;

pub use error::ServiceError;

use crate::config::FleetConfig;
use crate::dispatch::DispatchEngine;
use crate::fleet::{FleetChannels, RoundRobinPool};
use crate::matrix::{parse_matrix_file, to_wire, Matrix};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// High-level facade over the distributed multiplication pipeline.
///
/// [`connect`](Self::connect) opens one persistent channel per worker;
/// the channels live until [`shutdown`](Self::shutdown) (or drop)
/// closes them together. The facade is cheap to share behind an `Arc`
/// and serves concurrent requests.
pub struct MatrixService {
    engine: DispatchEngine,
}

impl MatrixService {
    /// Connects to every worker in the fleet and builds the engine.
    ///
    /// Fails fast if any endpoint is unreachable; a partial fleet is
    /// never returned.
    pub async fn connect(config: FleetConfig) -> Result<Self, ServiceError> {
        let endpoints = config.endpoints();
        info!(fleet = endpoints.len(), "connecting worker fleet");

        let channels = FleetChannels::connect(&endpoints).await?;
        let pool = RoundRobinPool::new(channels.len());
        let engine = DispatchEngine::new(Arc::new(channels), Arc::new(pool));

        Ok(Self { engine })
    }

    /// Number of workers behind this service.
    pub fn fleet_size(&self) -> usize {
        self.engine.fleet_size()
    }

    /// Multiplies two pre-validated matrices within a deadline.
    pub async fn multiply(
        &self,
        left: &Matrix,
        right: &Matrix,
        deadline: Duration,
    ) -> Result<Matrix, ServiceError> {
        Ok(self.engine.multiply(left, right, deadline).await?)
    }

    /// Gateway-facing operation: decode, validate, dispatch, encode.
    ///
    /// Inputs are upload text (rows on lines); the product comes back
    /// as bracket-notation text.
    pub async fn multiply_text(
        &self,
        left_text: &str,
        right_text: &str,
        deadline: Duration,
    ) -> Result<String, ServiceError> {
        let left = parse_matrix_file(left_text).map_err(ServiceError::Validation)?;
        let right = parse_matrix_file(right_text).map_err(ServiceError::Validation)?;

        let product = self.engine.multiply(&left, &right, deadline).await?;
        Ok(to_wire(&product))
    }

    /// Tears down every worker channel.
    pub fn shutdown(self) {
        info!("shutting down worker fleet channels");
        // Dropping the engine drops the channel collection; each
        // channel actor exits once its queue drains.
    }
}

impl std::fmt::Debug for MatrixService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixService")
            .field("fleet_size", &self.fleet_size())
            .finish()
    }
}
