//! Trace-event recorder
//!
//! Owns the session file and the record counter. `write_profile` may be
//! called from any thread; the separator decision, the record bytes,
//! and the counter increment happen under one lock so concurrent
//! writers can never tear a record or double a comma.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

const FILE_HEADER: &[u8] = b"{\"otherData\": {},\"traceEvents\":[";
const FILE_FOOTER: &[u8] = b"]}";

/// Errors from session management and record writes.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session '{name}' is already active")]
    SessionActive { name: String },

    #[error("no active session")]
    NoSession,
}

/// One completed timed interval, as handed in by a profiling span.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub name: String,
    pub start_us: i64,
    pub end_us: i64,
    pub thread_id: u64,
}

/// Wire form of one record inside `traceEvents`.
#[derive(Serialize)]
struct TraceEvent<'a> {
    cat: &'static str,
    dur: i64,
    name: &'a str,
    ph: &'static str,
    pid: u32,
    tid: u64,
    ts: i64,
}

struct Session {
    name: String,
    writer: BufWriter<File>,
    record_count: u64,
}

/// Append-only trace writer. At most one session is open at a time;
/// the session and its counter live behind a single mutex, the only
/// mutual exclusion in the workspace.
pub struct Recorder {
    session: Mutex<Option<Session>>,
}

impl Recorder {
    pub const fn new() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    /// Opens `path` and begins a named session.
    ///
    /// Fails with [`TraceError::SessionActive`] if a session is already
    /// open; two trace streams must never share one file.
    pub fn begin_session(&self, name: &str, path: impl AsRef<Path>) -> Result<(), TraceError> {
        let mut slot = self.session_slot();
        if let Some(active) = slot.as_ref() {
            return Err(TraceError::SessionActive {
                name: active.name.clone(),
            });
        }

        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(FILE_HEADER)?;
        writer.flush()?;

        tracing::debug!(
            session = name,
            path = %path.as_ref().display(),
            "trace session started"
        );
        *slot = Some(Session {
            name: name.to_string(),
            writer,
            record_count: 0,
        });
        Ok(())
    }

    /// Appends one record to the open session and flushes it.
    ///
    /// Fails with [`TraceError::NoSession`] when no session is open;
    /// the record is dropped, nothing is written.
    pub fn write_profile(&self, record: &ProfileRecord) -> Result<(), TraceError> {
        let mut slot = self.session_slot();
        let session = slot.as_mut().ok_or(TraceError::NoSession)?;

        // Separator and record go to the sink as one contiguous write;
        // a failed write leaves no dangling comma or torn record, and
        // the counter only advances once the sink accepted the bytes.
        let buf = encode_record(record, session.record_count == 0)
            .map_err(std::io::Error::from)?;
        session.writer.write_all(&buf)?;

        session.record_count += 1;
        session.writer.flush()?;
        Ok(())
    }

    /// Writes the footer and closes the session. A second call, or a
    /// call with no open session, is a no-op.
    pub fn end_session(&self) -> Result<(), TraceError> {
        let mut slot = self.session_slot();
        let Some(mut session) = slot.take() else {
            return Ok(());
        };

        session.writer.write_all(FILE_FOOTER)?;
        session.writer.flush()?;
        tracing::debug!(
            session = %session.name,
            records = session.record_count,
            "trace session ended"
        );
        Ok(())
    }

    /// Whether a session is currently open.
    pub fn is_active(&self) -> bool {
        self.session_slot().is_some()
    }

    /// Records written to the open session so far; zero when idle.
    pub fn record_count(&self) -> u64 {
        self.session_slot()
            .as_ref()
            .map_or(0, |session| session.record_count)
    }

    /// The critical section never panics while holding the lock on its
    /// own, but a caller-induced poison must not take every later span
    /// down with it: the session state is consistent either way.
    fn session_slot(&self) -> MutexGuard<'_, Option<Session>> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Encodes one record, leading separator included, into a single
/// buffer for one contiguous sink write.
fn encode_record(record: &ProfileRecord, first: bool) -> serde_json::Result<Vec<u8>> {
    // Embedded quotes become apostrophes so a hostile name cannot
    // break the document.
    let name = record.name.replace('"', "'");
    let event = TraceEvent {
        cat: "function",
        dur: record.end_us - record.start_us,
        name: &name,
        ph: "X",
        pid: 0,
        tid: record.thread_id,
        ts: record.start_us,
    };

    let mut buf = Vec::with_capacity(96);
    if !first {
        buf.push(b',');
    }
    serde_json::to_writer(&mut buf, &event)?;
    Ok(buf)
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide recorder used by the profiling macros. Explicit
/// [`Recorder`] instances remain available for callers that prefer
/// dependency injection.
static GLOBAL: Lazy<Recorder> = Lazy::new(Recorder::new);

pub fn global() -> &'static Recorder {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn trace_path(test: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tempo_{}_{}.json", test, std::process::id()))
    }

    fn record(name: &str, start_us: i64, end_us: i64) -> ProfileRecord {
        ProfileRecord {
            name: name.to_string(),
            start_us,
            end_us,
            thread_id: 7,
        }
    }

    fn parse_events(path: &Path) -> Vec<serde_json::Value> {
        let text = std::fs::read_to_string(path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        doc["traceEvents"].as_array().unwrap().clone()
    }

    #[test]
    fn session_produces_valid_json_with_all_records() {
        let path = trace_path("valid_json");
        let recorder = Recorder::new();
        recorder.begin_session("test", &path).unwrap();
        for i in 0..3 {
            recorder.write_profile(&record(&format!("event-{i}"), 10 * i, 10 * i + 5)).unwrap();
        }
        assert_eq!(recorder.record_count(), 3);
        recorder.end_session().unwrap();

        let events = parse_events(&path);
        assert_eq!(events.len(), 3);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event["cat"], "function");
            assert_eq!(event["ph"], "X");
            assert_eq!(event["pid"], 0);
            assert_eq!(event["tid"], 7);
            assert_eq!(event["ts"], 10 * i as i64);
            assert_eq!(event["dur"], 5);
            assert_eq!(event["name"], format!("event-{i}"));
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn quotes_in_names_become_apostrophes() {
        let path = trace_path("quotes");
        let recorder = Recorder::new();
        recorder.begin_session("test", &path).unwrap();
        recorder
            .write_profile(&record("say \"hello\" twice", 0, 1))
            .unwrap();
        recorder.end_session().unwrap();

        let events = parse_events(&path);
        let name = events[0]["name"].as_str().unwrap();
        assert_eq!(name, "say 'hello' twice");
        assert!(!name.contains('"'));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn end_session_twice_writes_one_footer() {
        let path = trace_path("double_end");
        let recorder = Recorder::new();
        recorder.begin_session("test", &path).unwrap();
        recorder.write_profile(&record("only", 0, 1)).unwrap();
        recorder.end_session().unwrap();
        recorder.end_session().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("]}").count(), 1);
        assert_eq!(parse_events(&path).len(), 1);
        assert!(!recorder.is_active());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn nested_begin_session_fails_fast() {
        let first = trace_path("nested_first");
        let second = trace_path("nested_second");
        let recorder = Recorder::new();
        recorder.begin_session("outer", &first).unwrap();

        let err = recorder.begin_session("inner", &second).unwrap_err();
        assert!(matches!(err, TraceError::SessionActive { name } if name == "outer"));

        // The original session is unharmed.
        recorder.write_profile(&record("still-writable", 0, 2)).unwrap();
        recorder.end_session().unwrap();
        assert_eq!(parse_events(&first).len(), 1);
        std::fs::remove_file(&first).ok();
    }

    #[test]
    fn write_without_session_is_an_error() {
        let recorder = Recorder::new();
        let err = recorder.write_profile(&record("orphan", 0, 1)).unwrap_err();
        assert!(matches!(err, TraceError::NoSession));
        assert_eq!(recorder.record_count(), 0);
    }

    #[test]
    fn unwritable_path_surfaces_io_error() {
        let recorder = Recorder::new();
        let err = recorder
            .begin_session("test", "/definitely/not/a/real/dir/out.json")
            .unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
        assert!(!recorder.is_active());
    }

    #[test]
    fn concurrent_writers_lose_no_records() {
        const THREADS: usize = 8;
        const RECORDS_PER_THREAD: usize = 50;

        let path = trace_path("concurrent");
        let recorder = Recorder::new();
        recorder.begin_session("test", &path).unwrap();

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let recorder = &recorder;
                scope.spawn(move || {
                    for i in 0..RECORDS_PER_THREAD {
                        let start = (t * RECORDS_PER_THREAD + i) as i64;
                        recorder
                            .write_profile(&record(&format!("job-{t}-{i}"), start, start + 1))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(recorder.record_count(), (THREADS * RECORDS_PER_THREAD) as u64);
        recorder.end_session().unwrap();

        let events = parse_events(&path);
        assert_eq!(events.len(), THREADS * RECORDS_PER_THREAD);
        for event in &events {
            assert!(event["name"].as_str().unwrap().starts_with("job-"));
            assert_eq!(event["dur"], 1);
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn global_recorder_is_shared() {
        assert!(std::ptr::eq(global(), global()));
    }

    #[test]
    fn separator_and_record_encode_as_one_buffer() {
        let first = encode_record(&record("first", 0, 1), true).unwrap();
        assert_ne!(first[0], b',');
        let value: serde_json::Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(value["name"], "first");

        let follow = encode_record(&record("follow", 2, 5), false).unwrap();
        assert_eq!(follow[0], b',');
        let value: serde_json::Value = serde_json::from_slice(&follow[1..]).unwrap();
        assert_eq!(value["name"], "follow");
        assert_eq!(value["dur"], 3);
    }

    #[test]
    fn poisoned_lock_does_not_stop_later_writes() {
        let path = trace_path("poisoned");
        let recorder = Recorder::new();
        recorder.begin_session("test", &path).unwrap();

        let poisoner = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = recorder.session.lock().unwrap();
            panic!("poison the session lock");
        }));
        assert!(poisoner.is_err());

        recorder.write_profile(&record("after-poison", 0, 1)).unwrap();
        assert!(recorder.is_active());
        recorder.end_session().unwrap();
        assert_eq!(parse_events(&path).len(), 1);
        std::fs::remove_file(&path).ok();
    }
}
