//! Service layer
//!
//! The process runner is trait-based so the coordinator can be exercised
//! without spawning real processes.

mod process;

pub use process::{ProcessRunner, TokioProcessRunner};
