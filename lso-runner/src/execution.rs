//! Execution types for the runner
//!
//! These types only exist while a run is in flight. They are turned into a
//! run outcome by the caller and then discarded.

use std::process::ExitStatus;
use std::time::Duration;

/// How a process came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited on its own with the given code
    Exited(i32),
    /// Terminated by a signal, no exit code available
    Signaled,
    /// Killed after exceeding its time limit
    TimedOut(Duration),
}

impl From<ExitStatus> for Termination {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Termination::Exited(code),
            None => Termination::Signaled,
        }
    }
}

/// Result of a finished process
#[derive(Debug, Clone)]
pub struct ProcessExit {
    pub termination: Termination,
    /// Interleaved stdout and stderr, lossily decoded as UTF-8
    pub output: String,
    pub elapsed: Duration,
}

impl ProcessExit {
    /// True only for a clean exit with code zero
    pub fn succeeded(&self) -> bool {
        self.termination == Termination::Exited(0)
    }
}
