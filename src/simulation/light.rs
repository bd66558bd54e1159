//! Fixed-cycle traffic light

use std::fmt;

/// What a light is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Green,
    Red,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Green => write!(f, "G"),
            Signal::Red => write!(f, "R"),
        }
    }
}

/// A light that is green for the first `green` ticks of every `period`
#[derive(Debug, Clone)]
pub struct Light {
    period: usize,
    green: usize,
    /// Position within the current cycle, always in `0..period`
    position: usize,
}

impl Light {
    /// Create a light at the start of its cycle. `period` must be non-zero;
    /// a `green` longer than the period is always green.
    pub fn new(period: usize, green: usize) -> Self {
        assert!(period > 0, "light period must be at least one tick");
        Self {
            period,
            green,
            position: 0,
        }
    }

    pub fn step(&mut self) {
        self.position = (self.position + 1) % self.period;
    }

    pub fn is_green(&self) -> bool {
        self.position < self.green
    }

    pub fn signal(&self) -> Signal {
        if self.is_green() {
            Signal::Green
        } else {
            Signal::Red
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn green(&self) -> usize {
        self.green
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn four_tick_cycle_with_two_green() {
        let mut light = Light::new(4, 2);
        let mut shown = String::new();
        for _ in 0..8 {
            shown.push_str(&light.to_string());
            light.step();
        }
        assert_eq!(shown, "GGRRGGRR");
    }

    #[test]
    fn zero_green_is_always_red() {
        let mut light = Light::new(3, 0);
        for _ in 0..6 {
            assert_eq!(light.signal(), Signal::Red);
            light.step();
        }
    }

    proptest! {
        #[test]
        fn green_after_k_steps_matches_cycle(
            period in 1usize..30,
            green_frac in 0.0f64..=1.0,
            k in 0usize..200,
        ) {
            let green = (period as f64 * green_frac) as usize;
            let mut light = Light::new(period, green);
            for _ in 0..k {
                light.step();
            }
            prop_assert_eq!(light.is_green(), (k % period) < green);
        }
    }
}
