//! Plain-text statistics summary

use crate::aggregator::StatsAggregator;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempo_core::TimeUnit;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("summary i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the summary report for `stats` to a file at `path`.
pub fn write_summary(
    stats: &StatsAggregator,
    unit: TimeUnit,
    path: impl AsRef<Path>,
) -> Result<(), StatsError> {
    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    write_summary_to(stats, unit, &mut out)?;
    out.flush()?;
    tracing::debug!(
        path = %path.as_ref().display(),
        samples = stats.len(),
        "statistics summary written"
    );
    Ok(())
}

/// Writes the summary report to any sink.
pub fn write_summary_to(
    stats: &StatsAggregator,
    unit: TimeUnit,
    out: &mut impl Write,
) -> Result<(), StatsError> {
    let label = unit.label();
    writeln!(out, "Statistics Summary:")?;
    writeln!(out, "-------------------")?;
    writeln!(out, "Average Time: {} {}", stats.average(), label)?;
    writeln!(out, "Variance: {} {}", stats.variance(), label)?;
    writeln!(out, "Standard Deviation: {} {}", stats.std_deviation(), label)?;
    writeln!(out, "Median Time: {} {}", stats.median(), label)?;
    writeln!(out, "Minimum Time: {} {}", stats.min(), label)?;
    writeln!(out, "Maximum Time: {} {}", stats.max(), label)?;
    writeln!(out, "-------------------")?;
    Ok(())
}
