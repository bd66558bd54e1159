//! Junction Simulation Library
//!
//! A tick-based simulation of one road junction with two traffic lights.

pub mod config;
pub mod simulation;
