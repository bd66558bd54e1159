//! Probabilistic vehicle generator
//!
//! Arrivals follow a repeating schedule of regimes. Within a regime each tick
//! is an independent Bernoulli trial for an arrival, followed by a second
//! draw that picks the destination.

use std::fmt;

use anyhow::{ensure, Context, Result};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Destination, Tick, Vehicle};

/// One row of the arrival schedule
#[derive(Debug, Clone, PartialEq)]
pub struct Regime {
    /// Number of ticks the regime lasts
    pub duration: Tick,
    /// Chance of an arrival on each tick, in `[0, 1]`
    pub arrival_prob: f64,
    /// Chance that an arrival is headed south, in `[0, 1]`
    pub turn_prob: f64,
    /// Free-form label, only used when printing the setup
    pub comment: String,
}

impl Regime {
    pub fn new(
        duration: Tick,
        arrival_prob: f64,
        turn_prob: f64,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            duration,
            arrival_prob,
            turn_prob,
            comment: comment.into(),
        }
    }
}

/// The built-in schedule used when no regime table is supplied.
/// Heavy enough that queues will build up.
pub fn default_regimes() -> Vec<Regime> {
    vec![
        Regime::new(30, 0.7, 0.5, "First interval"),
        Regime::new(20, 0.8, 0.7, "Second interval"),
    ]
}

pub struct VehicleGenerator {
    regimes: Vec<Regime>,
    /// Cumulative end tick of each regime
    end_ticks: Vec<Tick>,
    total_cycle: Tick,
    /// Position within the cycle, always in `0..total_cycle`
    time: Tick,
    /// Index of the active regime
    period: usize,
    /// Optional seeded RNG for reproducible runs
    rng: Option<StdRng>,
}

impl VehicleGenerator {
    fn new_internal(regimes: Vec<Regime>, rng: Option<StdRng>) -> Result<Self> {
        ensure!(!regimes.is_empty(), "at least one arrival regime is required");
        let mut end_ticks = Vec::with_capacity(regimes.len());
        let mut end: Tick = 0;
        for (i, regime) in regimes.iter().enumerate() {
            ensure!(
                (0.0..=1.0).contains(&regime.arrival_prob),
                "regime {}: arrival probability {} is outside [0, 1]",
                i + 1,
                regime.arrival_prob
            );
            ensure!(
                (0.0..=1.0).contains(&regime.turn_prob),
                "regime {}: turning probability {} is outside [0, 1]",
                i + 1,
                regime.turn_prob
            );
            end = end.checked_add(regime.duration).with_context(|| {
                format!("regime {}: total duration exceeds {} ticks", i + 1, Tick::MAX)
            })?;
            end_ticks.push(end);
        }

        let total_cycle = end_ticks.last().copied().unwrap_or(0);
        ensure!(total_cycle > 0, "arrival regimes must cover at least one tick");

        Ok(Self {
            regimes,
            end_ticks,
            total_cycle,
            time: 0,
            period: 0,
            rng,
        })
    }

    pub fn new(regimes: Vec<Regime>) -> Result<Self> {
        Self::new_internal(regimes, None)
    }

    /// Create a generator with a seeded RNG for reproducible simulations
    pub fn with_seed(regimes: Vec<Regime>, seed: u64) -> Result<Self> {
        Self::new_internal(regimes, Some(StdRng::seed_from_u64(seed)))
    }

    /// Uniform draw in `[0, 1)`, using the seeded RNG if available
    fn draw(&mut self) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.random::<f64>(),
            None => rand::rng().random::<f64>(),
        }
    }

    /// Advance the schedule by one tick and maybe produce a vehicle stamped
    /// with `now`.
    pub fn step(&mut self, now: Tick) -> Option<Vehicle> {
        self.time += 1;
        if self.time >= self.total_cycle {
            self.time = 0;
            self.period = 0;
        }
        // Zero-length regimes are skipped over
        while self.time >= self.end_ticks[self.period] {
            self.period += 1;
        }

        let regime = &self.regimes[self.period];
        let (arrival_prob, turn_prob) = (regime.arrival_prob, regime.turn_prob);

        if self.draw() >= arrival_prob {
            return None;
        }
        let destination = if self.draw() < turn_prob {
            Destination::South
        } else {
            Destination::West
        };
        trace!("generated vehicle {} at tick {}", destination, now);
        Some(Vehicle::new(destination, now))
    }

    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    pub fn total_cycle(&self) -> Tick {
        self.total_cycle
    }

    /// Index of the active regime
    pub fn period(&self) -> usize {
        self.period
    }

    /// Position within the repeating schedule
    pub fn time(&self) -> Tick {
        self.time
    }

    pub fn current_regime(&self) -> &Regime {
        &self.regimes[self.period]
    }
}

impl fmt::Display for VehicleGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regime = self.current_regime();
        write!(
            f,
            "{:4}: <{}, {:.2}, {:.2}>",
            self.time, self.period, regime.arrival_prob, regime.turn_prob
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periods_follow_cumulative_end_ticks() {
        let regimes = vec![
            Regime::new(2, 0.0, 0.0, "a"),
            Regime::new(3, 0.0, 0.0, "b"),
        ];
        let mut generator = VehicleGenerator::with_seed(regimes, 1).unwrap();
        let mut seen = Vec::new();
        for tick in 1..=10 {
            generator.step(tick);
            seen.push((generator.time(), generator.period()));
        }
        assert_eq!(
            seen,
            vec![
                (1, 0),
                (2, 1),
                (3, 1),
                (4, 1),
                (0, 0),
                (1, 0),
                (2, 1),
                (3, 1),
                (4, 1),
                (0, 0),
            ]
        );
    }

    #[test]
    fn zero_length_regime_is_skipped() {
        let regimes = vec![
            Regime::new(1, 0.0, 0.0, "a"),
            Regime::new(0, 0.0, 0.0, "empty"),
            Regime::new(2, 0.0, 0.0, "c"),
        ];
        let mut generator = VehicleGenerator::with_seed(regimes, 1).unwrap();
        generator.step(1);
        assert_eq!(generator.period(), 2);
    }

    #[test]
    fn certain_arrival_and_turn() {
        let mut generator =
            VehicleGenerator::with_seed(vec![Regime::new(5, 1.0, 1.0, "")], 3).unwrap();
        for tick in 1..=20 {
            let vehicle = generator.step(tick).expect("arrival probability is 1");
            assert_eq!(vehicle.destination(), Destination::South);
            assert_eq!(vehicle.created_at(), tick);
        }
    }

    #[test]
    fn never_arrives_with_zero_probability() {
        let mut generator = VehicleGenerator::new(vec![Regime::new(5, 0.0, 1.0, "")]).unwrap();
        assert!((1..=100).all(|tick| generator.step(tick).is_none()));
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(VehicleGenerator::new(Vec::new()).is_err());
        assert!(VehicleGenerator::new(vec![Regime::new(0, 0.5, 0.5, "")]).is_err());
        assert!(VehicleGenerator::new(vec![Regime::new(5, 1.5, 0.5, "")]).is_err());
        assert!(VehicleGenerator::new(vec![Regime::new(5, 0.5, -0.1, "")]).is_err());
    }

    #[test]
    fn durations_past_tick_max_are_rejected() {
        let regimes = vec![
            Regime::new(Tick::MAX, 0.5, 0.5, "a"),
            Regime::new(1, 0.5, 0.5, "b"),
        ];
        let err = VehicleGenerator::new(regimes).err().expect("overflowing table");
        assert!(err.to_string().contains("regime 2: total duration exceeds"));
    }

    #[test]
    fn display_shows_current_state() {
        let generator = VehicleGenerator::new(default_regimes()).unwrap();
        assert_eq!(generator.to_string(), "   0: <0, 0.70, 0.50>");
    }
}
