//! Persistent worker channels.
//!
//! One channel per fleet endpoint, opened during service initialization
//! and torn down together at shutdown. Each channel is a small actor
//! task that owns the framed TCP connection; callers submit an
//! operation with a oneshot reply, so concurrent calls to the same
//! endpoint queue in FIFO order on that endpoint's channel while calls
//! to different endpoints proceed independently.

use crate::matrix::{from_wire, to_wire, Matrix};
use crate::protocol::{self, BlockRequest, BlockResponse, FramedStream};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Queued calls per worker channel before senders wait.
pub const CHANNEL_DEPTH: usize = 32;

/// Errors surfaced by a remote block call.
#[derive(Debug, Error, Clone)]
pub enum CallError {
    /// The TCP connection could not be established or failed mid-call.
    #[error("worker {worker} unreachable: {message}")]
    Unreachable { worker: usize, message: String },

    /// The channel actor has shut down (connection lost or service
    /// shutdown already ran).
    #[error("worker {worker} channel closed")]
    ChannelClosed { worker: usize },

    /// The worker answered with a failure.
    #[error("worker {worker} rejected the call: {message}")]
    Rejected { worker: usize, message: String },

    /// The worker's reply was not a valid protocol frame.
    #[error("worker {worker} protocol failure: {message}")]
    Protocol { worker: usize, message: String },
}

struct ChannelRequest {
    op: &'static str,
    a: Matrix,
    b: Matrix,
    reply: oneshot::Sender<Result<Matrix, CallError>>,
}

/// A persistent request/response channel to one worker.
///
/// Cheap to clone; all clones feed the same connection actor.
#[derive(Clone)]
pub struct WorkerChannel {
    worker: usize,
    tx: mpsc::Sender<ChannelRequest>,
}

impl WorkerChannel {
    /// Opens the connection to one worker endpoint and starts its actor.
    pub async fn connect(worker: usize, addr: SocketAddr) -> Result<Self, CallError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| CallError::Unreachable {
                worker,
                message: e.to_string(),
            })?;
        let framed = protocol::frame(stream);

        let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);
        tokio::spawn(run_channel(worker, framed, rx));

        debug!(worker, %addr, "worker channel opened");
        Ok(Self { worker, tx })
    }

    /// Identifier of the worker this channel is bound to.
    pub fn worker(&self) -> usize {
        self.worker
    }

    /// Performs one remote block operation.
    pub async fn call(&self, op: &'static str, a: Matrix, b: Matrix) -> Result<Matrix, CallError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = ChannelRequest {
            op,
            a,
            b,
            reply: reply_tx,
        };

        self.tx
            .send(request)
            .await
            .map_err(|_| CallError::ChannelClosed {
                worker: self.worker,
            })?;

        reply_rx.await.map_err(|_| CallError::ChannelClosed {
            worker: self.worker,
        })?
    }
}

impl std::fmt::Debug for WorkerChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerChannel")
            .field("worker", &self.worker)
            .finish()
    }
}

/// Connection actor: drains queued calls, one exchange at a time.
async fn run_channel(
    worker: usize,
    mut framed: FramedStream,
    mut rx: mpsc::Receiver<ChannelRequest>,
) {
    while let Some(request) = rx.recv().await {
        let ChannelRequest { op, a, b, reply } = request;
        let result = exchange(worker, &mut framed, op, &a, &b).await;
        let failed = result.is_err();
        let _ = reply.send(result);

        if failed {
            // The connection state is unknown after a transport error;
            // stop and fail any queued callers via ChannelClosed.
            warn!(worker, "worker channel closing after failed exchange");
            return;
        }
    }
    debug!(worker, "worker channel closed");
}

/// One request/response exchange over the framed connection.
async fn exchange(
    worker: usize,
    framed: &mut FramedStream,
    op: &'static str,
    a: &Matrix,
    b: &Matrix,
) -> Result<Matrix, CallError> {
    let request = BlockRequest::new(op, to_wire(a), to_wire(b));
    let payload = protocol::encode_request(&request).map_err(|e| CallError::Protocol {
        worker,
        message: e.to_string(),
    })?;

    framed
        .send(payload)
        .await
        .map_err(|e| CallError::Unreachable {
            worker,
            message: e.to_string(),
        })?;

    let frame = match framed.next().await {
        Some(Ok(frame)) => frame,
        Some(Err(e)) => {
            return Err(CallError::Unreachable {
                worker,
                message: e.to_string(),
            })
        }
        None => return Err(CallError::ChannelClosed { worker }),
    };

    match protocol::decode_response(&frame).map_err(|e| CallError::Protocol {
        worker,
        message: e.to_string(),
    })? {
        BlockResponse::Block { matrix } => from_wire(&matrix).map_err(|e| CallError::Protocol {
            worker,
            message: e.to_string(),
        }),
        BlockResponse::Failure { error } => Err(CallError::Rejected {
            worker,
            message: error,
        }),
    }
}

/// All per-endpoint channels of the fleet.
///
/// Created once by [`connect`](Self::connect); dropping the collection
/// (via service shutdown) closes every channel actor together.
#[derive(Debug)]
pub struct FleetChannels {
    channels: Vec<WorkerChannel>,
}

impl FleetChannels {
    /// Opens one persistent channel per endpoint, in order.
    ///
    /// Fails fast: if any endpoint is unreachable, no partial fleet is
    /// returned.
    pub async fn connect(endpoints: &[SocketAddr]) -> Result<Self, CallError> {
        let mut channels = Vec::with_capacity(endpoints.len());
        for (worker, addr) in endpoints.iter().enumerate() {
            channels.push(WorkerChannel::connect(worker, *addr).await?);
        }
        Ok(Self { channels })
    }

    /// Number of connected workers.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when no workers are connected.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// The channel for a worker identifier drawn from the pool.
    ///
    /// Panics if the identifier is out of range; pool and channels are
    /// always built to the same fleet size.
    pub fn get(&self, worker: usize) -> &WorkerChannel {
        &self.channels[worker]
    }
}
