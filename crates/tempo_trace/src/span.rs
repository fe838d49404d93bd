//! Profiling spans
//!
//! A `ProfileSpan` brackets one contiguous scope: it captures a start
//! timestamp on construction and hands a completed record to the
//! recorder when stopped or dropped. No pause/resume; fixed to
//! microsecond resolution.

use crate::clock;
use crate::recorder::{self, ProfileRecord, Recorder};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub struct ProfileSpan<'a> {
    recorder: &'a Recorder,
    name: String,
    start_us: i64,
    end_us: Option<i64>,
}

impl ProfileSpan<'static> {
    /// Starts a span that reports to the process-wide recorder.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_recorder(recorder::global(), name)
    }
}

impl<'a> ProfileSpan<'a> {
    /// Starts a span that reports to an explicit recorder.
    pub fn with_recorder(recorder: &'a Recorder, name: impl Into<String>) -> Self {
        Self {
            recorder,
            name: name.into(),
            start_us: clock::timestamp_us(),
            end_us: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Completes the span and hands the record to the recorder. A
    /// second call is a no-op. A record that cannot be written (no
    /// open session, sink failure) is logged and dropped; a profiling
    /// failure never takes the host scope down with it.
    pub fn stop(&mut self) {
        if self.end_us.is_some() {
            return;
        }
        let end_us = clock::timestamp_us();
        self.end_us = Some(end_us);

        let record = ProfileRecord {
            name: self.name.clone(),
            start_us: self.start_us,
            end_us,
            thread_id: current_thread_id(),
        };
        if let Err(err) = self.recorder.write_profile(&record) {
            tracing::warn!(span = %self.name, %err, "profile record dropped");
        }
    }

    /// Microseconds elapsed; partial while the span is still open,
    /// frozen once stopped.
    pub fn elapsed_us(&self) -> i64 {
        self.end_us.unwrap_or_else(clock::timestamp_us) - self.start_us
    }

    pub fn is_stopped(&self) -> bool {
        self.end_us.is_some()
    }
}

impl Drop for ProfileSpan<'_> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Process-local hash of the current thread's identity. Unique within
/// one run; not stable across runs.
fn current_thread_id() -> u64 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn trace_path(test: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tempo_span_{}_{}.json", test, std::process::id()))
    }

    fn parse_events(path: &std::path::Path) -> Vec<serde_json::Value> {
        let text = std::fs::read_to_string(path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        doc["traceEvents"].as_array().unwrap().clone()
    }

    #[test]
    fn drop_writes_exactly_one_record() {
        let path = trace_path("drop_once");
        let recorder = Recorder::new();
        recorder.begin_session("test", &path).unwrap();
        {
            let mut span = ProfileSpan::with_recorder(&recorder, "work");
            span.stop();
            // Drop after an explicit stop must not write again.
        }
        recorder.end_session().unwrap();

        let events = parse_events(&path);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["name"], "work");
        assert!(events[0]["dur"].as_i64().unwrap() >= 0);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn early_exit_still_records() {
        let path = trace_path("early_exit");
        let recorder = Recorder::new();
        recorder.begin_session("test", &path).unwrap();

        fn bail_out(recorder: &Recorder) -> Result<(), ()> {
            let _span = ProfileSpan::with_recorder(recorder, "bails");
            Err(())
        }
        assert!(bail_out(&recorder).is_err());

        recorder.end_session().unwrap();
        assert_eq!(parse_events(&path).len(), 1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn span_without_session_is_dropped_quietly() {
        let recorder = Recorder::new();
        let mut span = ProfileSpan::with_recorder(&recorder, "orphan");
        span.stop(); // logs a warning, must not panic
        assert!(span.is_stopped());
        assert_eq!(recorder.record_count(), 0);
    }

    #[test]
    fn elapsed_freezes_on_stop() {
        let recorder = Recorder::new();
        let mut span = ProfileSpan::with_recorder(&recorder, "t");
        std::thread::sleep(std::time::Duration::from_millis(5));
        span.stop();
        let frozen = span.elapsed_us();
        assert!(frozen >= 5_000);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(span.elapsed_us(), frozen);
    }

    #[test]
    fn spans_carry_their_thread_id() {
        let a = current_thread_id();
        let b = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(a, b);
        assert_eq!(a, current_thread_id());
    }
}
