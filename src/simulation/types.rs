//! Core types for the junction simulation

use std::fmt;

/// A discrete simulation time step
pub type Tick = u64;

/// Which signal-controlled lane a vehicle is heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Turning into the south lane
    South,
    /// Continuing into the west lane
    West,
}

impl Destination {
    /// One-character tag used when rendering lanes and queues
    pub fn tag(self) -> char {
        match self {
            Destination::South => 'S',
            Destination::West => 'W',
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A vehicle travelling through the junction
///
/// Vehicles are never cloned while in the system; a vehicle is moved from
/// queue to lane to lane and finally dropped when it exits.
#[derive(Debug, PartialEq, Eq)]
pub struct Vehicle {
    created_at: Tick,
    destination: Destination,
}

impl Vehicle {
    pub fn new(destination: Destination, created_at: Tick) -> Self {
        Self {
            created_at,
            destination,
        }
    }

    /// The tick at which the vehicle was generated
    pub fn created_at(&self) -> Tick {
        self.created_at
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Number of ticks since the vehicle was generated
    pub fn travel_time(&self, now: Tick) -> Tick {
        now.saturating_sub(self.created_at)
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.destination)
    }
}
