//! Round-robin worker selection.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Hands out worker identifiers in a fair, cyclic order.
///
/// The pool holds the identifiers `0..size` in FIFO order behind a
/// single mutex, so every [`take`](Self::take) is atomic with respect
/// to every other. Each drawn identifier is appended back to the end
/// of the ordering immediately, which means:
///
/// - availability is never withheld: the pool cannot run dry;
/// - no identifier repeats before all others have had a turn;
/// - a worker may be handed out again for a concurrent request, or
///   even within the same batch, before any in-flight call to it
///   completes. Workers are stateless per call, so this is safe.
#[derive(Debug)]
pub struct RoundRobinPool {
    cursor: Mutex<VecDeque<usize>>,
}

impl RoundRobinPool {
    /// Creates a pool over the identifiers `0..size`.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "fleet size must be > 0");
        Self {
            cursor: Mutex::new((0..size).collect()),
        }
    }

    /// Number of distinct workers in the pool.
    pub fn len(&self) -> usize {
        self.cursor.lock().expect("pool mutex poisoned").len()
    }

    /// True when the pool tracks no workers (never, by construction).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Draws the next `n` identifiers, re-queuing each immediately.
    ///
    /// Returned in draw order. Drawing more than the fleet size wraps
    /// around within the batch.
    pub fn take(&self, n: usize) -> Vec<usize> {
        let mut cursor = self.cursor.lock().expect("pool mutex poisoned");
        (0..n)
            .map(|_| {
                let id = cursor.pop_front().expect("pool is never empty");
                cursor.push_back(id);
                id
            })
            .collect()
    }
}
