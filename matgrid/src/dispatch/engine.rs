//! Deadline-scaled dispatch of quadrant-block operations.

use crate::fleet::{CallError, FleetChannels, RoundRobinPool};
use crate::matrix::{join_quadrants, split_quadrants, Matrix, MatrixError};
use crate::protocol::{OP_ADD, OP_MULTIPLY};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Remote calls left after the sampled multiply: 7 multiplies + 4 adds.
pub const REMAINING_CALLS: u32 = 11;

/// Errors surfaced by a dispatch request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Operands have different sizes.
    #[error("operand sizes differ: left is {left}x{left}, right is {right}x{right}")]
    ShapeMismatch { left: usize, right: usize },

    /// The caller supplied a zero deadline.
    #[error("deadline must be positive")]
    ZeroDeadline,

    /// An operand could not be partitioned or the results rejoined.
    #[error(transparent)]
    Blocks(#[from] MatrixError),

    /// A remote call failed; the whole request is abandoned.
    #[error(transparent)]
    Remote(#[from] CallError),

    /// A dispatch sub-task died before reporting a result.
    #[error("dispatch sub-task failed: {0}")]
    SubTask(String),
}

/// Workers needed to finish the remaining calls within the deadline.
///
/// One sampled call latency stands in for all remaining calls: workers
/// are assumed homogeneous and every block the same size, so
/// `footprint * 11` approximates the total remaining work. The result
/// is clamped to `[1, fleet_size]` and governs only how many distinct
/// endpoints share the 11 calls, never the call count itself.
pub fn required_workers(footprint: Duration, deadline: Duration, fleet_size: usize) -> usize {
    let footprint_ns = footprint.as_nanos();
    let deadline_ns = deadline.as_nanos().max(1);
    let needed = (footprint_ns * REMAINING_CALLS as u128).div_ceil(deadline_ns);
    needed.clamp(1, fleet_size as u128) as usize
}

/// Cycles `drawn` workers over `slots` assignment positions.
fn assignment_cycle(drawn: &[usize], slots: usize) -> Vec<usize> {
    (0..slots).map(|i| drawn[i % drawn.len()]).collect()
}

/// Orchestrates one deadline-scaled block multiplication at a time.
///
/// Holds no per-request state; a single engine serves concurrent
/// requests, which share the pool's fairness cursor.
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    channels: Arc<FleetChannels>,
    pool: Arc<RoundRobinPool>,
}

impl DispatchEngine {
    /// Builds an engine over a connected fleet and its selection pool.
    ///
    /// Panics if the pool and channel collection disagree on fleet
    /// size; they are always constructed together.
    pub fn new(channels: Arc<FleetChannels>, pool: Arc<RoundRobinPool>) -> Self {
        assert_eq!(
            channels.len(),
            pool.len(),
            "pool and channels must cover the same fleet"
        );
        Self { channels, pool }
    }

    /// Number of workers this engine can draw from.
    pub fn fleet_size(&self) -> usize {
        self.pool.len()
    }

    /// Multiplies two equally sized square matrices within a deadline.
    ///
    /// The deadline is an admission-control signal: it decides how many
    /// workers share the remaining calls, and never affects the result.
    /// The first failed remote call aborts the request; in-flight
    /// sibling calls are left to finish on their own.
    pub async fn multiply(
        &self,
        left: &Matrix,
        right: &Matrix,
        deadline: Duration,
    ) -> Result<Matrix, DispatchError> {
        if left.dim() != right.dim() {
            return Err(DispatchError::ShapeMismatch {
                left: left.dim(),
                right: right.dim(),
            });
        }
        if deadline.is_zero() {
            return Err(DispatchError::ZeroDeadline);
        }

        let [l_tl, l_tr, l_bl, l_br] = split_quadrants(left)?;
        let [r_tl, r_tr, r_bl, r_br] = split_quadrants(right)?;

        // Sample one multiply to estimate the cost of the rest.
        let sampler = self.pool.take(1)[0];
        debug!(worker = sampler, "sampling block-multiply latency");
        let started = Instant::now();
        let sample = self
            .channels
            .get(sampler)
            .call(OP_MULTIPLY, l_tl.clone(), r_tl.clone())
            .await?;
        let footprint = started.elapsed();

        let workers = required_workers(footprint, deadline, self.pool.len());
        info!(
            footprint_ns = footprint.as_nanos() as u64,
            deadline_ns = deadline.as_nanos() as u64,
            workers,
            "sized fan-out from sampled call latency"
        );

        let drawn = self.pool.take(workers);
        let slots = assignment_cycle(&drawn, REMAINING_CALLS as usize);

        // Remaining multiplies, one per pairing of the fixed 2x2 block
        // identity. All seven run concurrently.
        let tl_b = self.spawn_call(slots[0], OP_MULTIPLY, l_tr.clone(), r_bl.clone());
        let tr_a = self.spawn_call(slots[1], OP_MULTIPLY, l_tl, r_tr.clone());
        let tr_b = self.spawn_call(slots[2], OP_MULTIPLY, l_tr, r_br.clone());
        let bl_a = self.spawn_call(slots[3], OP_MULTIPLY, l_bl.clone(), r_tl);
        let bl_b = self.spawn_call(slots[4], OP_MULTIPLY, l_br.clone(), r_bl);
        let br_a = self.spawn_call(slots[5], OP_MULTIPLY, l_bl, r_tr);
        let br_b = self.spawn_call(slots[6], OP_MULTIPLY, l_br, r_br);

        // Each addition is a continuation gated on its two inputs; the
        // top-left one consumes the sample directly.
        let tl_sum = self.spawn_add_to_ready(slots[7], sample, tl_b);
        let tr_sum = self.spawn_add(slots[8], tr_a, tr_b);
        let bl_sum = self.spawn_add(slots[9], bl_a, bl_b);
        let br_sum = self.spawn_add(slots[10], br_a, br_b);

        let tl = joined(tl_sum).await?;
        let tr = joined(tr_sum).await?;
        let bl = joined(bl_sum).await?;
        let br = joined(br_sum).await?;

        Ok(join_quadrants(&tl, &tr, &bl, &br)?)
    }

    /// Spawns one remote block call on the assigned worker.
    fn spawn_call(
        &self,
        worker: usize,
        op: &'static str,
        a: Matrix,
        b: Matrix,
    ) -> JoinHandle<Result<Matrix, DispatchError>> {
        let channel = self.channels.get(worker).clone();
        tokio::spawn(async move { Ok(channel.call(op, a, b).await?) })
    }

    /// Spawns an addition gated on two in-flight multiplies.
    fn spawn_add(
        &self,
        worker: usize,
        lhs: JoinHandle<Result<Matrix, DispatchError>>,
        rhs: JoinHandle<Result<Matrix, DispatchError>>,
    ) -> JoinHandle<Result<Matrix, DispatchError>> {
        let channel = self.channels.get(worker).clone();
        tokio::spawn(async move {
            let lhs = joined(lhs).await?;
            let rhs = joined(rhs).await?;
            Ok(channel.call(OP_ADD, lhs, rhs).await?)
        })
    }

    /// Spawns an addition whose left input is already available.
    fn spawn_add_to_ready(
        &self,
        worker: usize,
        lhs: Matrix,
        rhs: JoinHandle<Result<Matrix, DispatchError>>,
    ) -> JoinHandle<Result<Matrix, DispatchError>> {
        let channel = self.channels.get(worker).clone();
        tokio::spawn(async move {
            let rhs = joined(rhs).await?;
            Ok(channel.call(OP_ADD, lhs, rhs).await?)
        })
    }
}

/// Awaits a sub-task, flattening panics into [`DispatchError::SubTask`].
async fn joined(handle: JoinHandle<Result<Matrix, DispatchError>>) -> Result<Matrix, DispatchError> {
    match handle.await {
        Ok(result) => result,
        Err(e) => Err(DispatchError::SubTask(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLEET: usize = 8;

    #[test]
    fn test_required_workers_floors_at_one() {
        // Arbitrarily generous deadline still engages one worker.
        let workers = required_workers(
            Duration::from_micros(10),
            Duration::from_secs(3600),
            FLEET,
        );
        assert_eq!(workers, 1);
    }

    #[test]
    fn test_required_workers_clamps_to_fleet_size() {
        // Deadline far below footprint * 11 demands the whole fleet.
        let workers = required_workers(Duration::from_millis(100), Duration::from_nanos(1), FLEET);
        assert_eq!(workers, FLEET);
    }

    #[test]
    fn test_required_workers_rounds_up() {
        // 11 calls of 10ms against a 55ms deadline: exactly 2 workers.
        let workers = required_workers(
            Duration::from_millis(10),
            Duration::from_millis(55),
            FLEET,
        );
        assert_eq!(workers, 2);

        // One nanosecond tighter and the division must round up to 3.
        let workers = required_workers(
            Duration::from_millis(10),
            Duration::from_millis(55) - Duration::from_nanos(1),
            FLEET,
        );
        assert_eq!(workers, 3);
    }

    #[test]
    fn test_required_workers_zero_footprint() {
        let workers = required_workers(Duration::ZERO, Duration::from_secs(1), FLEET);
        assert_eq!(workers, 1);
    }

    #[test]
    fn test_assignment_cycle_covers_all_slots() {
        let slots = assignment_cycle(&[4, 7, 1], REMAINING_CALLS as usize);
        assert_eq!(slots, vec![4, 7, 1, 4, 7, 1, 4, 7, 1, 4, 7]);
    }

    #[test]
    fn test_assignment_cycle_single_worker() {
        let slots = assignment_cycle(&[3], 11);
        assert_eq!(slots, vec![3; 11]);
    }
}
