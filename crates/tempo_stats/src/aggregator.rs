//! Elapsed-time sample aggregation
//!
//! All derived statistics are zero for an empty sample set by
//! convention; callers that must tell "no data" from "zero time" check
//! [`StatsAggregator::len`] first. One owner per aggregator; no
//! internal locking.

#[derive(Debug, Default)]
pub struct StatsAggregator {
    samples: Vec<i64>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one elapsed-time sample. Unbounded, duplicates kept.
    pub fn add_measurement(&mut self, value: i64) {
        self.samples.push(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[i64] {
        &self.samples
    }

    /// Arithmetic mean.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<i64>() as f64 / self.samples.len() as f64
    }

    /// Population variance (divide by n, not n-1).
    pub fn variance(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.average();
        self.samples
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / self.samples.len() as f64
    }

    pub fn std_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Median over a sorted copy; even counts average the two central
    /// elements.
    pub fn median(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_unstable();
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
        } else {
            sorted[mid] as f64
        }
    }

    pub fn min(&self) -> i64 {
        self.samples.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> i64 {
        self.samples.iter().copied().max().unwrap_or(0)
    }
}
