//! Tempo Runtime
//!
//! Minimal binary that exercises the instrumentation crates end to
//! end: a multi-threaded trace session, scoped console timers, and a
//! statistics summary.

use anyhow::Result;
use tempo_core::{TimeUnit, Timer};
use tempo_stats::StatsAggregator;
use tempo_trace::ProfileSpan;

const TRACE_PATH: &str = "trace.json";
const SUMMARY_PATH: &str = "stats.txt";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Tempo v{}", tempo_core::VERSION);

    tempo_trace::global().begin_session("demo", TRACE_PATH)?;
    let mut overall = Timer::new("demo total", TimeUnit::Milliseconds);

    run_workers(4, 8);
    collect_samples(16)?;

    tracing::info!(
        records = tempo_trace::global().record_count(),
        "trace session complete"
    );
    tempo_trace::global().end_session()?;
    overall.stop();

    tracing::info!(trace = TRACE_PATH, summary = SUMMARY_PATH, "artifacts written");
    Ok(())
}

/// Spawns `workers` threads, each bracketing `steps` units of work
/// with profiling spans feeding the shared session.
fn run_workers(workers: u64, steps: u64) {
    tempo_trace::profile_function!();

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            std::thread::spawn(move || {
                for step in 0..steps {
                    let _span = ProfileSpan::new(format!("worker-{worker}/step-{step}"));
                    busy_work(2_000 + worker * 500);
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("worker panicked");
        }
    }
}

/// Times `count` repetitions of the same workload and writes the
/// distribution to the summary report.
fn collect_samples(count: usize) -> Result<()> {
    tempo_trace::profile_function!();

    let mut stats = StatsAggregator::new();
    for _ in 0..count {
        let mut timer = Timer::silent("sample", TimeUnit::Microseconds);
        busy_work(1_000);
        timer.stop();
        stats.add_measurement(timer.elapsed());
    }
    tempo_stats::write_summary(&stats, TimeUnit::Microseconds, SUMMARY_PATH)?;
    Ok(())
}

fn busy_work(iterations: u64) {
    let mut acc = 0u64;
    for i in 0..iterations {
        acc = acc.wrapping_add(i).rotate_left(3);
    }
    std::hint::black_box(acc);
}
