//! Scoped wall-clock timers
//!
//! A `Timer` measures elapsed time between start and stop, with
//! pause/resume in between. Dropping a timer stops it, so a timer bound
//! to a scope finalizes and reports exactly once on every exit path.

use crate::unit::TimeUnit;
use std::time::Instant;

/// Timer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Paused,
    Stopped,
}

pub struct Timer {
    name: String,
    unit: TimeUnit,
    state: TimerState,
    /// Ticks folded in by pause/stop. Frozen once Stopped.
    accumulated: i64,
    /// Captured at the most recent start/resume.
    epoch: Instant,
    print_on_stop: bool,
}

impl Timer {
    /// Creates a timer that is already running and reports to stdout
    /// when stopped.
    pub fn new(name: impl Into<String>, unit: TimeUnit) -> Self {
        Self {
            name: name.into(),
            unit,
            state: TimerState::Running,
            accumulated: 0,
            epoch: Instant::now(),
            print_on_stop: true,
        }
    }

    /// Creates a running timer that stays silent on stop.
    pub fn silent(name: impl Into<String>, unit: TimeUnit) -> Self {
        let mut timer = Self::new(name, unit);
        timer.print_on_stop = false;
        timer
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Restarts a stopped timer from zero. No-op in any other state.
    pub fn start(&mut self) {
        if self.state == TimerState::Stopped {
            self.accumulated = 0;
            self.epoch = Instant::now();
            self.state = TimerState::Running;
        }
    }

    /// Folds the running segment into the accumulated total and holds.
    /// No-op unless Running.
    pub fn pause(&mut self) {
        if self.state == TimerState::Running {
            self.accumulated += self.unit.ticks(self.epoch.elapsed());
            self.state = TimerState::Paused;
        }
    }

    /// Continues timing after a pause. No-op unless Paused.
    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.epoch = Instant::now();
            self.state = TimerState::Running;
        }
    }

    /// Back to a fresh running state, discarding accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = 0;
        self.epoch = Instant::now();
        self.state = TimerState::Running;
    }

    /// Finalizes the elapsed total. Reports to stdout when
    /// `print_on_stop` is set. No-op if already stopped.
    pub fn stop(&mut self) {
        match self.state {
            TimerState::Running => {
                self.accumulated += self.unit.ticks(self.epoch.elapsed());
            }
            TimerState::Paused => {}
            TimerState::Stopped => return,
        }
        self.state = TimerState::Stopped;
        if self.print_on_stop {
            println!("{} : {} {}", self.name, self.accumulated, self.unit.label());
        }
    }

    /// Elapsed ticks so far. Includes the live segment while Running;
    /// frozen once Stopped.
    pub fn elapsed(&self) -> i64 {
        match self.state {
            TimerState::Running => self.accumulated + self.unit.ticks(self.epoch.elapsed()),
            TimerState::Paused | TimerState::Stopped => self.accumulated,
        }
    }

    /// Whether the final elapsed total fit within `budget` ticks.
    /// Always `false` before the timer has stopped.
    pub fn completed_within(&self, budget: i64) -> bool {
        self.state == TimerState::Stopped && self.accumulated <= budget
    }

    pub fn set_print_on_stop(&mut self, print: bool) {
        self.print_on_stop = print;
    }

    pub fn prints_on_stop(&self) -> bool {
        self.print_on_stop
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}
