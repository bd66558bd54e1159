//! Shift-register lane model
//!
//! A lane is a fixed number of slots. Index 0 is the exit end and the last
//! index is the entry end. Vehicles creep at most one slot toward the exit
//! per tick, into the slot directly ahead once that slot is free.

use std::fmt;

use super::error::SimError;
use super::types::Vehicle;

#[derive(Debug)]
pub struct Lane {
    slots: Vec<Option<Vehicle>>,
}

impl Lane {
    /// Create an empty lane. `capacity` must be at least one.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "lane capacity must be at least one");
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Advance every vehicle except the one at the exit by one slot, if the
    /// slot ahead of it is free.
    ///
    /// The sweep runs from the exit toward the entry in a single pass, so a
    /// closed-up run of vehicles behind a gap moves up together while each
    /// vehicle advances at most one slot:
    ///
    /// ```text
    /// <.SS.W>  ->  <SS.W.>
    /// ```
    pub fn step(&mut self) {
        for i in 0..self.slots.len() - 1 {
            if self.slots[i].is_none() && self.slots[i + 1].is_some() {
                self.slots[i] = self.slots[i + 1].take();
            }
        }
    }

    /// Take the vehicle at the exit, if any
    pub fn remove_first(&mut self) -> Option<Vehicle> {
        self.slots[0].take()
    }

    pub fn first(&self) -> Option<&Vehicle> {
        self.slots[0].as_ref()
    }

    /// True if the entry slot is empty
    pub fn last_free(&self) -> bool {
        self.slots[self.slots.len() - 1].is_none()
    }

    /// Place a vehicle in the entry slot.
    ///
    /// Callers must check [`Lane::last_free`] first; an occupied entry slot is
    /// reported as [`SimError::LaneOverflow`] and the vehicle is dropped with
    /// the error.
    pub fn put_last(&mut self, vehicle: Vehicle) -> Result<(), SimError> {
        let capacity = self.slots.len();
        let last = &mut self.slots[capacity - 1];
        if last.is_some() {
            return Err(SimError::LaneOverflow { capacity });
        }
        *last = Some(vehicle);
        Ok(())
    }

    pub fn number_of_vehicles(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Read-only view of the slots, exit first
    pub fn slots(&self) -> &[Option<Vehicle>] {
        &self.slots
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for slot in &self.slots {
            match slot {
                Some(vehicle) => write!(f, "{}", vehicle.destination().tag())?,
                None => write!(f, ".")?,
            }
        }
        write!(f, ">")
    }
}
