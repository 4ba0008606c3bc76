//! Core data types for depot.
//!
//! This crate defines the values that flow through a publish transaction:
//! artifact coordinates, build configurations and their membership,
//! publish filters with their POM templates, repository connection settings,
//! and the on-disk configuration they are loaded from.
//!
//! This crate is intentionally free of network I/O.

pub mod artifact;
pub mod config;
pub mod configuration;
pub mod filter;
pub mod properties;
pub mod settings;
