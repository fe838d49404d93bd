//! Tempo Trace
//!
//! Session-based trace-event recorder. Completed timing spans from any
//! number of threads are serialized into one JSON document readable by
//! chrome://tracing or ui.perfetto.dev.

pub mod clock;
pub mod recorder;
pub mod span;

pub use recorder::{global, ProfileRecord, Recorder, TraceError};
pub use span::ProfileSpan;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Declare a profiling span bound to the enclosing scope, reporting to
/// the process-wide recorder when the scope exits.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::ProfileSpan::new($name);
    };
}

/// Like [`profile_scope!`] but named after the enclosing function.
#[macro_export]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::ProfileSpan::new({
            fn f() {}
            fn type_name_of<T>(_: T) -> &'static str {
                std::any::type_name::<T>()
            }
            let name = type_name_of(f);
            name.strip_suffix("::f").unwrap_or(name)
        });
    };
}
