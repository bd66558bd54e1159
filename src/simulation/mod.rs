//! Discrete-time model of a single junction
//!
//! An entry lane feeds two light-controlled lanes, south and west. Vehicles
//! arrive from a random generator, wait in an unbounded queue, and move one
//! slot per tick. Nothing here does I/O; see [`crate::config`] for loading
//! parameters and the binary for the console loop.

mod clock;
mod error;
mod generator;
mod lane;
mod light;
mod measurements;
mod runner;
mod traffic_system;
mod types;

pub use clock::SimClock;
pub use error::SimError;
pub use generator::{default_regimes, Regime, VehicleGenerator};
pub use lane::Lane;
pub use light::{Light, Signal};
pub use measurements::Measurements;
pub use runner::Simulation;
pub use traffic_system::{DestinationStats, Setup, Snapshot, Statistics, TrafficSystem};
pub use types::{Destination, Tick, Vehicle};
