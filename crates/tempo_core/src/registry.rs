//! Named timer registry
//!
//! Tracks multiple silent timers keyed by name. No internal locking;
//! callers that share a registry across threads synchronize externally.

use crate::timer::Timer;
use crate::unit::TimeUnit;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from operations on a named timer collection.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no timer named '{name}'")]
    NotFound { name: String },

    #[error("timer '{name}' already exists")]
    DuplicateName { name: String },
}

#[derive(Default)]
pub struct TimerRegistry {
    timers: HashMap<String, Timer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new named timer. Registry timers never print; read them
    /// back with [`elapsed`](Self::elapsed).
    pub fn start(&mut self, name: &str, unit: TimeUnit) -> Result<(), RegistryError> {
        if self.timers.contains_key(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.timers
            .insert(name.to_string(), Timer::silent(name, unit));
        Ok(())
    }

    pub fn pause(&mut self, name: &str) -> Result<(), RegistryError> {
        self.get_mut(name)?.pause();
        Ok(())
    }

    pub fn resume(&mut self, name: &str) -> Result<(), RegistryError> {
        self.get_mut(name)?.resume();
        Ok(())
    }

    pub fn stop(&mut self, name: &str) -> Result<(), RegistryError> {
        self.get_mut(name)?.stop();
        Ok(())
    }

    /// Elapsed ticks of a tracked timer, partial while it runs.
    pub fn elapsed(&self, name: &str) -> Result<i64, RegistryError> {
        self.timers
            .get(name)
            .map(Timer::elapsed)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Moves a tracked timer to a new name. Fails without touching
    /// either entry if `from` is missing or `to` is already taken.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), RegistryError> {
        if !self.timers.contains_key(from) {
            return Err(RegistryError::NotFound {
                name: from.to_string(),
            });
        }
        if self.timers.contains_key(to) {
            return Err(RegistryError::DuplicateName {
                name: to.to_string(),
            });
        }
        // Both checks passed; remove cannot fail now.
        if let Some(mut timer) = self.timers.remove(from) {
            timer.set_name(to);
            self.timers.insert(to.to_string(), timer);
        }
        Ok(())
    }

    /// Removes and returns a tracked timer, running or not.
    pub fn remove(&mut self, name: &str) -> Result<Timer, RegistryError> {
        self.timers
            .remove(name)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&Timer> {
        self.timers.get(name)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Timer)> {
        self.timers.iter()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Timer, RegistryError> {
        self.timers
            .get_mut(name)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }
}
