//! The worker fleet as seen from the dispatching side.
//!
//! - [`RoundRobinPool`] hands out worker identifiers fairly. It is a
//!   fairness cursor, not a lock: identifiers are re-queued the moment
//!   they are drawn, and nothing is ever "released".
//! - [`WorkerChannel`] is a persistent framed connection to one worker,
//!   opened once at service start and closed at shutdown.
//! - [`FleetChannels`] owns one channel per fleet endpoint.

mod channel;
mod pool;

pub use channel::{CallError, FleetChannels, WorkerChannel, CHANNEL_DEPTH};
pub use pool::RoundRobinPool;
