//! Foundational data structures, error types and reader configuration.

pub mod config;
pub mod error;
pub mod models;
