//! Tempo Core
//!
//! Contains the fundamental timing types:
//! - Duration unit tagging
//! - State-machine timers with scoped auto-stop
//! - Named timer registry

pub mod registry;
pub mod timer;
pub mod unit;

pub use registry::{RegistryError, TimerRegistry};
pub use timer::{Timer, TimerState};
pub use unit::TimeUnit;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Declare a printing timer bound to the enclosing scope.
///
/// The timer reports to stdout when the scope exits, on every exit
/// path. Defaults to microseconds.
#[macro_export]
macro_rules! scope_timer {
    ($name:expr) => {
        let _scope_timer = $crate::Timer::new($name, $crate::TimeUnit::Microseconds);
    };
    ($name:expr, $unit:expr) => {
        let _scope_timer = $crate::Timer::new($name, $unit);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn scope_timer_macro_compiles_in_statement_position() {
        scope_timer!("macro-default");
        scope_timer!("macro-unit", TimeUnit::Nanoseconds);
    }
}
