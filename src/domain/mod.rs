//! Core domain types and logic.

pub mod step;
pub mod simulator;
pub mod generators;
pub mod scenario;
pub mod summary;
pub mod config_validation;
pub mod error;
