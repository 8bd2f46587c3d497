//! LSO Core
//!
//! Core types shared by the LSO services.
//!
//! This crate contains:
//! - Domain types: jobs, inventories and run outcomes
//! - DTOs: request and response bodies of the HTTP API
//! - Validation errors raised while checking inbound requests

pub mod domain;
pub mod dto;
pub mod error;

pub use error::ValidationError;
