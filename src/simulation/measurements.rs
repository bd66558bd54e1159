//! Travel-time sample collector

use sorted_vec::SortedVec;

use super::types::Tick;

/// Collects travel-time samples and answers summary queries.
///
/// Samples are kept sorted, so min, max and median are plain lookups.
#[derive(Debug, Clone)]
pub struct Measurements {
    samples: SortedVec<Tick>,
    sum: u128,
}

impl Default for Measurements {
    fn default() -> Self {
        Self::new()
    }
}

impl Measurements {
    pub fn new() -> Self {
        Self {
            samples: SortedVec::new(),
            sum: 0,
        }
    }

    pub fn add(&mut self, sample: Tick) {
        self.samples.insert(sample);
        self.sum += u128::from(sample);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.sum as f64 / self.samples.len() as f64)
        }
    }

    pub fn min(&self) -> Option<Tick> {
        self.samples.first().copied()
    }

    pub fn max(&self) -> Option<Tick> {
        self.samples.last().copied()
    }

    /// Middle sample; the mean of the two middle samples for even counts
    pub fn median(&self) -> Option<f64> {
        let n = self.samples.len();
        if n == 0 {
            return None;
        }
        if n % 2 == 1 {
            Some(self.samples[n / 2] as f64)
        } else {
            Some((self.samples[n / 2 - 1] + self.samples[n / 2]) as f64 / 2.0)
        }
    }
}
