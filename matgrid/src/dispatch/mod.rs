//! The dispatch engine: deadline-scaled fan-out of block operations.
//!
//! A single multiplication request turns into 12 remote calls: one
//! sampled multiply whose latency sizes the fan-out, then 7 more
//! multiplies and 4 adds spread across however many workers the
//! deadline demands.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      DispatchEngine                          │
//! │  split → sample → size fan-out → fan out → join quadrants    │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────────┐        ┌──────────────────────────────┐  │
//! │  │ RoundRobinPool │        │ FleetChannels                │  │
//! │  │ fair cursor    │        │ one persistent conn / worker │  │
//! │  └────────────────┘        └──────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod engine;

pub use engine::{required_workers, DispatchEngine, DispatchError, REMAINING_CALLS};
