//! Configuration management
//!
//! This module handles basic configuration for the ledger,
//! currently the location of the chain data directory.

pub mod settings;

pub use settings::{Config, GLOBAL_CONFIG};
