//! Utility functions and helpers
//!
//! This module contains the hashing and serialization helpers
//! used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::sha256_digest;
pub use serialization::{deserialize, serialize};
