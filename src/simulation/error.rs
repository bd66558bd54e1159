//! Error types for the junction simulation
//!
//! Every variant here is a contract violation by the caller, never a
//! transient condition. A run that hits one of these must stop.

use std::error::Error;
use std::fmt;

use super::types::Tick;

/// Errors raised by the core simulation components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// `Lane::put_last` was called while the entry slot was occupied.
    LaneOverflow {
        /// Capacity of the lane that overflowed.
        capacity: usize,
    },
    /// `SimClock::set_time` was called after stepping had begun.
    ClockStarted {
        /// The tick the clock was at when the call was rejected.
        now: Tick,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LaneOverflow { capacity } => {
                write!(f, "the last position is occupied (lane capacity {capacity})")
            }
            Self::ClockStarted { now } => {
                write!(f, "set_time may not be called during a simulation (now = {now})")
            }
        }
    }
}

impl Error for SimError {}
