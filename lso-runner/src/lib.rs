//! LSO Runner
//!
//! Launches automation processes outside of the request that asked for them.
//!
//! Architecture:
//! - Command: builds the argument vector for `ansible-playbook` or a plain executable
//! - Execution: termination and captured output of a finished process
//! - Inventory: stages structured inventories as temporary files
//! - Service: the [`ProcessRunner`] seam and its tokio implementation
//!
//! Stdout and stderr are captured into a single buffer in the order the
//! bytes arrive, so the caller sees the same interleaving a terminal would.

pub mod command;
pub mod error;
pub mod execution;
pub mod inventory;
pub mod service;

pub use command::CommandSpec;
pub use error::RunnerError;
pub use execution::{ProcessExit, Termination};
pub use inventory::StagedInventory;
pub use service::{ProcessRunner, TokioProcessRunner};
