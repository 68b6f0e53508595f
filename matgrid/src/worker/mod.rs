//! Stateless compute workers.
//!
//! A [`WorkerServer`] binds one fleet endpoint and serves block-add and
//! block-multiply requests over framed TCP connections. Every call is
//! independent and carries no session state, so any worker can service
//! any request from any dispatch call, including concurrent requests
//! from the same dispatcher.
//!
//! Malformed input is answered as a call failure; the worker process
//! never crashes on bad input.

mod fleet_launcher;

pub use fleet_launcher::{launch_local_fleet, FleetHandle, FALLBACK_EXECUTION_UNITS};

use crate::matrix::{block_add, block_multiply, from_wire, to_wire, Matrix, MatrixError};
use crate::protocol::{self, BlockRequest, BlockResponse, OP_ADD, OP_MULTIPLY};
use futures::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Errors a worker reports back to its caller.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The request named an operation this worker does not serve.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A matrix failed to decode or the operands were incompatible.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// A compute worker bound to one fleet endpoint.
pub struct WorkerServer {
    id: usize,
    listener: TcpListener,
}

impl WorkerServer {
    /// Binds a worker to the given endpoint.
    pub async fn bind(id: usize, addr: SocketAddr) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { id, listener })
    }

    /// The address this worker actually bound (useful with port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the token is cancelled.
    ///
    /// Each connection is served on its own task; in-flight connections
    /// run to EOF even after shutdown begins.
    pub async fn serve(self, shutdown: CancellationToken) -> io::Result<()> {
        let addr = self.listener.local_addr()?;
        debug!(worker = self.id, %addr, "worker listening");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(worker = self.id, "worker shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted?;
                    debug!(worker = self.id, peer = %peer, "connection accepted");
                    tokio::spawn(handle_connection(self.id, stream));
                }
            }
        }
    }
}

/// Serves one framed connection until the peer disconnects.
async fn handle_connection(worker_id: usize, stream: TcpStream) {
    let mut framed = protocol::frame(stream);

    while let Some(incoming) = framed.next().await {
        let payload = match incoming {
            Ok(payload) => payload,
            Err(e) => {
                warn!(worker = worker_id, error = %e, "framing error, dropping connection");
                return;
            }
        };

        let response = handle_request(worker_id, &payload);
        let bytes = match protocol::encode_response(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(worker = worker_id, error = %e, "failed to encode response");
                return;
            }
        };

        if let Err(e) = framed.send(bytes).await {
            warn!(worker = worker_id, error = %e, "failed to send response");
            return;
        }
    }
}

/// Decodes one request payload and produces its reply.
///
/// Every failure path becomes a [`BlockResponse::Failure`]; nothing
/// here can take the worker down.
fn handle_request(worker_id: usize, payload: &[u8]) -> BlockResponse {
    let request = match protocol::decode_request(payload) {
        Ok(request) => request,
        Err(e) => return BlockResponse::failure(e.to_string()),
    };

    debug!(worker = worker_id, op = %request.op, "serving block operation");

    match execute(&request) {
        Ok(result) => BlockResponse::Block {
            matrix: to_wire(&result),
        },
        Err(e) => {
            warn!(worker = worker_id, op = %request.op, error = %e, "block operation rejected");
            BlockResponse::failure(e.to_string())
        }
    }
}

/// Runs the requested kernel over the decoded operands.
fn execute(request: &BlockRequest) -> Result<Matrix, WorkerError> {
    let a = from_wire(&request.matrix_a)?;
    let b = from_wire(&request.matrix_b)?;

    match request.op.as_str() {
        OP_ADD => Ok(block_add(&a, &b)?),
        OP_MULTIPLY => Ok(block_multiply(&a, &b)?),
        other => Err(WorkerError::UnknownOperation(other.to_string())),
    }
}
