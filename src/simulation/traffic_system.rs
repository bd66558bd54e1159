//! The junction: an entry lane splitting into two signal-controlled lanes
//!
//! ```text
//!   (W light) west lane  <---+
//!                            +--- entry lane <--- queue <--- generator
//!   (S light) south lane <---+
//! ```
//!
//! [`TrafficSystem::step`] is the single tick driver. Its phases run in a
//! fixed order and later phases observe the effects of earlier ones.

use std::collections::VecDeque;
use std::fmt;

use log::{debug, trace};

use super::error::SimError;
use super::generator::{Regime, VehicleGenerator};
use super::lane::Lane;
use super::light::{Light, Signal};
use super::measurements::Measurements;
use super::types::{Destination, Tick, Vehicle};
use crate::config::JunctionConfig;

pub struct TrafficSystem {
    config: JunctionConfig,
    generator: VehicleGenerator,
    /// Vehicles waiting to get onto the entry lane
    queue: VecDeque<Vehicle>,
    lane: Lane,
    lane_south: Lane,
    lane_west: Lane,
    light_south: Light,
    light_west: Light,

    times_south: Measurements,
    times_west: Measurements,
    exits_south: u64,
    exits_west: u64,
    /// Vehicles moved from the entry lane into a destination lane
    arrivals: u64,
    /// Vehicles moved from the queue onto the entry lane
    entered: u64,
    generated: u64,
    /// Ticks on which the entry lane's front vehicle was stuck, counted per lane
    blocked: u64,
    /// Ticks that ended with a non-empty queue
    queued: u64,
    ticks: u64,
}

impl TrafficSystem {
    pub fn new(config: JunctionConfig, generator: VehicleGenerator) -> Self {
        Self {
            generator,
            queue: VecDeque::new(),
            lane: Lane::new(config.lane_length),
            lane_south: Lane::new(config.lane_ws_length),
            lane_west: Lane::new(config.lane_ws_length),
            light_south: Light::new(config.light_period, config.light_south_green),
            light_west: Light::new(config.light_period, config.light_west_green),
            times_south: Measurements::new(),
            times_west: Measurements::new(),
            exits_south: 0,
            exits_west: 0,
            arrivals: 0,
            entered: 0,
            generated: 0,
            blocked: 0,
            queued: 0,
            ticks: 0,
            config,
        }
    }

    /// Advance the whole junction by one tick. `now` stamps generated vehicles
    /// and is used to compute travel times of exiting vehicles.
    ///
    /// An error means a lane was overfilled. The system must not be stepped
    /// again after that.
    pub fn step(&mut self, now: Tick) -> Result<(), SimError> {
        self.ticks += 1;

        // Exits through the lights, then the destination lanes move up
        if release(&self.light_south, &mut self.lane_south, &mut self.times_south, now) {
            self.exits_south += 1;
        }
        self.lane_south.step();

        if release(&self.light_west, &mut self.lane_west, &mut self.times_west, now) {
            self.exits_west += 1;
        }
        self.lane_west.step();

        // Entry lane front into the destination lanes
        if admit(&mut self.lane, &mut self.lane_south, Destination::South)? {
            self.arrivals += 1;
        }
        if admit(&mut self.lane, &mut self.lane_west, Destination::West)? {
            self.arrivals += 1;
        }

        if is_blocked(&self.lane, &self.lane_south, Destination::South) {
            debug!("tick {now}: south lane full, entry lane blocked");
            self.blocked += 1;
        }
        if is_blocked(&self.lane, &self.lane_west, Destination::West) {
            debug!("tick {now}: west lane full, entry lane blocked");
            self.blocked += 1;
        }

        self.lane.step();

        if let Some(vehicle) = self.generator.step(now) {
            self.generated += 1;
            self.queue.push_back(vehicle);
        }

        if self.lane.last_free() {
            if let Some(vehicle) = self.queue.pop_front() {
                self.lane.put_last(vehicle)?;
                self.entered += 1;
            }
        }

        if !self.queue.is_empty() {
            self.queued += 1;
        }

        self.light_south.step();
        self.light_west.step();

        trace!("tick {now}:\n{}", self.snapshot());
        Ok(())
    }

    /// Vehicles on the three lanes. The queue is outside the junction and
    /// is not counted.
    pub fn number_in_system(&self) -> usize {
        self.lane.number_of_vehicles()
            + self.lane_south.number_of_vehicles()
            + self.lane_west.number_of_vehicles()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn exits(&self, destination: Destination) -> u64 {
        match destination {
            Destination::South => self.exits_south,
            Destination::West => self.exits_west,
        }
    }

    pub fn travel_times(&self, destination: Destination) -> &Measurements {
        match destination {
            Destination::South => &self.times_south,
            Destination::West => &self.times_west,
        }
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn entered(&self) -> u64 {
        self.entered
    }

    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn blocked_ticks(&self) -> u64 {
        self.blocked
    }

    pub fn queued_ticks(&self) -> u64 {
        self.queued
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &JunctionConfig {
        &self.config
    }

    pub fn entry_lane(&self) -> &Lane {
        &self.lane
    }

    pub fn lane(&self, destination: Destination) -> &Lane {
        match destination {
            Destination::South => &self.lane_south,
            Destination::West => &self.lane_west,
        }
    }

    pub fn light(&self, destination: Destination) -> &Light {
        match destination {
            Destination::South => &self.light_south,
            Destination::West => &self.light_west,
        }
    }

    /// Current state of lights, lanes and queue for printing
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            west_light: self.light_west.signal(),
            west_lane: self.lane_west.to_string(),
            entry_lane: self.lane.to_string(),
            south_light: self.light_south.signal(),
            south_lane: self.lane_south.to_string(),
            queue: self.queue.iter().map(|v| v.destination().tag()).collect(),
        }
    }

    pub fn statistics(&self) -> Statistics {
        let percent = |count: u64| {
            if self.ticks == 0 {
                0.0
            } else {
                100.0 * count as f64 / self.ticks as f64
            }
        };
        Statistics {
            ticks: self.ticks,
            arrivals: self.arrivals,
            exited: self.exits_south + self.exits_west,
            in_system: self.number_in_system(),
            queue_len: self.queue.len(),
            west: DestinationStats::new(self.exits_west, &self.times_west),
            south: DestinationStats::new(self.exits_south, &self.times_south),
            blocked_percent: percent(self.blocked),
            queued_percent: percent(self.queued),
        }
    }

    pub fn setup(&self) -> Setup {
        Setup {
            config: self.config.clone(),
            regimes: self.generator.regimes().to_vec(),
        }
    }
}

/// Let the front vehicle through a green light, recording its travel time
fn release(light: &Light, lane: &mut Lane, times: &mut Measurements, now: Tick) -> bool {
    if !light.is_green() {
        return false;
    }
    match lane.remove_first() {
        Some(vehicle) => {
            let travel_time = vehicle.travel_time(now);
            debug!("tick {now}: vehicle {vehicle} exits after {travel_time} ticks");
            times.add(travel_time);
            true
        }
        None => false,
    }
}

/// Move the entry lane's front vehicle into `target` if it is headed there
/// and there is room
fn admit(entry: &mut Lane, target: &mut Lane, destination: Destination) -> Result<bool, SimError> {
    if !target.last_free() || !front_is(entry, destination) {
        return Ok(false);
    }
    match entry.remove_first() {
        Some(vehicle) => {
            debug!("vehicle {vehicle} born at tick {} admitted", vehicle.created_at());
            target.put_last(vehicle)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn is_blocked(entry: &Lane, target: &Lane, destination: Destination) -> bool {
    !target.last_free() && front_is(entry, destination)
}

fn front_is(lane: &Lane, destination: Destination) -> bool {
    lane.first().map(Vehicle::destination) == Some(destination)
}

/// Printable state of the junction at a tick boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub west_light: Signal,
    pub west_lane: String,
    pub entry_lane: String,
    pub south_light: Signal,
    pub south_lane: String,
    /// Destination tags of queued vehicles, front first
    pub queue: String,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "({}){}{}", self.west_light, self.west_lane, self.entry_lane)?;
        write!(f, "({}){} Q [{}]", self.south_light, self.south_lane, self.queue)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DestinationStats {
    pub exits: u64,
    pub mean: Option<f64>,
    pub min: Option<Tick>,
    pub max: Option<Tick>,
}

impl DestinationStats {
    fn new(exits: u64, times: &Measurements) -> Self {
        Self {
            exits,
            mean: times.mean(),
            min: times.min(),
            max: times.max(),
        }
    }
}

impl fmt::Display for DestinationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number: {}", self.exits)?;
        match (self.mean, self.min, self.max) {
            (Some(mean), Some(min), Some(max)) => {
                writeln!(f, "mean: {mean:.2}")?;
                writeln!(f, "min: {min}")?;
                write!(f, "max: {max}")
            }
            _ => write!(f, "no travel times recorded"),
        }
    }
}

/// End-of-batch report
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub ticks: u64,
    pub arrivals: u64,
    pub exited: u64,
    pub in_system: usize,
    pub queue_len: usize,
    pub west: DestinationStats,
    pub south: DestinationStats,
    pub blocked_percent: f64,
    pub queued_percent: f64,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Statistics after {} time steps ===", self.ticks)?;
        writeln!(f, "Arrived at junction  : {}", self.arrivals)?;
        writeln!(f, "Total exited         : {}", self.exited)?;
        writeln!(f, "Number in the system : {}", self.in_system)?;
        writeln!(f, "Waiting in queue     : {}", self.queue_len)?;
        writeln!(f)?;
        writeln!(f, "Exit west")?;
        writeln!(f, "{}", self.west)?;
        writeln!(f)?;
        writeln!(f, "Exit south")?;
        writeln!(f, "{}", self.south)?;
        writeln!(f)?;
        writeln!(f, "Percent time steps with block: {:.1}%", self.blocked_percent)?;
        write!(f, "Percent time steps with queue: {:.1}%", self.queued_percent)
    }
}

/// Parameters of a run, for printing before the first tick
#[derive(Debug, Clone)]
pub struct Setup {
    pub config: JunctionConfig,
    pub regimes: Vec<Regime>,
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "laneLength      : {}", self.config.lane_length)?;
        writeln!(f, "laneWSLength    : {}", self.config.lane_ws_length)?;
        writeln!(f, "lightPeriod     : {}", self.config.light_period)?;
        writeln!(f, "lightWestGreen  : {}", self.config.light_west_green)?;
        writeln!(f, "lightSouthGreen : {}", self.config.light_south_green)?;
        write!(f, "Traffic periods and probabilities:")?;
        for regime in &self.regimes {
            write!(
                f,
                "\n\t{:4}, {:4.2}, {:4.2}  {}",
                regime.duration, regime.arrival_prob, regime.turn_prob, regime.comment
            )?;
        }
        Ok(())
    }
}
