//! Service Module
//!
//! Business logic layer: resolving what to run and coordinating runs.

pub mod coordinator;
pub mod resolver;
