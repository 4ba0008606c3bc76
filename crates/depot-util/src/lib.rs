//! Shared utilities for depot.
//!
//! This crate provides cross-cutting concerns used by the other depot crates:
//! the unified error type and filesystem helpers.

pub mod errors;
pub mod fs;
