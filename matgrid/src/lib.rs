//! Matgrid - Deadline-scaled distributed matrix multiplication
//!
//! This library multiplies square matrices by partitioning them into
//! quadrant blocks and fanning the block operations out to a fleet of
//! stateless remote compute workers. A single sampled call latency is
//! measured per request and weighed against a caller-supplied deadline
//! to decide how many of the available workers to engage.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use matgrid::config::FleetConfig;
//! use matgrid::service::MatrixService;
//! use std::time::Duration;
//!
//! let service = MatrixService::connect(FleetConfig::default()).await?;
//! let product = service
//!     .multiply_text("1 2\n3 4", "5 6\n7 8", Duration::from_secs(1))
//!     .await?;
//! ```

pub mod config;
pub mod dispatch;
pub mod fleet;
pub mod gateway;
pub mod logging;
pub mod matrix;
pub mod protocol;
pub mod service;
pub mod worker;

/// Version of the matgrid library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
