//! Simulation clock
//!
//! The driver owns exactly one clock and hands the current tick to
//! [`TrafficSystem::step`](super::TrafficSystem::step). Nothing else writes it.

use super::error::SimError;
use super::types::Tick;

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    time: Tick,
    started: bool,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Tick {
        self.time
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Move the clock forward one tick and return the new time
    pub fn advance(&mut self) -> Tick {
        self.started = true;
        self.time += 1;
        self.time
    }

    /// Set the clock directly. Only allowed before the first `advance()`.
    pub fn set_time(&mut self, time: Tick) -> Result<(), SimError> {
        if self.started {
            return Err(SimError::ClockStarted { now: self.time });
        }
        self.time = time;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_time_before_start_is_allowed() {
        let mut clock = SimClock::new();
        clock.set_time(41).unwrap();
        assert_eq!(clock.advance(), 42);
    }

    #[test]
    fn set_time_after_start_fails_and_keeps_time() {
        let mut clock = SimClock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.set_time(100), Err(SimError::ClockStarted { now: 2 }));
        assert_eq!(clock.now(), 2);
    }
}
