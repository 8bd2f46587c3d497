//! Core domain types
//!
//! These types describe a single playbook run from acceptance to the
//! outcome that is reported back to the caller. Nothing here is persisted.

pub mod inventory;
pub mod job;
pub mod outcome;
