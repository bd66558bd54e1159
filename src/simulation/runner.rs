//! Clocked driver around a [`TrafficSystem`]

use log::error;

use super::clock::SimClock;
use super::error::SimError;
use super::traffic_system::TrafficSystem;
use super::types::Tick;

/// Owns the simulation clock and advances the junction one tick at a time
pub struct Simulation {
    clock: SimClock,
    system: TrafficSystem,
    /// Set once a step has failed; no further steps are taken
    failed: Option<SimError>,
}

impl Simulation {
    pub fn new(system: TrafficSystem) -> Self {
        Self {
            clock: SimClock::new(),
            system,
            failed: None,
        }
    }

    /// Start the clock at `time` instead of zero. Only allowed before the first step.
    pub fn set_time(&mut self, time: Tick) -> Result<(), SimError> {
        self.clock.set_time(time)
    }

    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Advance the clock and the junction by one tick and return the new time.
    ///
    /// After the first error the simulation is halted and every later call
    /// returns the same error without touching the junction.
    pub fn step(&mut self) -> Result<Tick, SimError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let now = self.clock.advance();
        if let Err(err) = self.system.step(now) {
            error!("simulation halted at tick {now}: {err}");
            self.failed = Some(err.clone());
            return Err(err);
        }
        Ok(now)
    }

    /// Run up to `ticks` steps, calling `on_tick` after each one
    pub fn run<F>(&mut self, ticks: u64, mut on_tick: F) -> Result<(), SimError>
    where
        F: FnMut(Tick, &TrafficSystem),
    {
        for _ in 0..ticks {
            let now = self.step()?;
            on_tick(now, &self.system);
        }
        Ok(())
    }

    pub fn system(&self) -> &TrafficSystem {
        &self.system
    }

    pub fn is_halted(&self) -> bool {
        self.failed.is_some()
    }
}
