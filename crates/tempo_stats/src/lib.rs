//! Tempo Stats
//!
//! Descriptive statistics over collected elapsed-time samples, and a
//! plain-text summary report writer.

pub mod aggregator;
pub mod report;

pub use aggregator::StatsAggregator;
pub use report::{write_summary, write_summary_to, StatsError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
