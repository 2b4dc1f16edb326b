//! # Minichain - a single-node educational ledger
//!
//! Blocks of transactions are chained together by hash, secured with a
//! proof-of-work puzzle, and persisted in an embedded sled database.
//! Account balances are derived from an unspent-transaction-output scan
//! of the whole chain.
//!
//! ## How the code is organized
//! - `core/`: blocks, transactions, the chain store, and proof-of-work
//! - `config/`: data-directory configuration
//! - `utils/`: hashing and serialization helpers
//! - `cli/`: command-line argument parsing
//! - `error/`: error types shared by every operation
//!
//! Ownership of outputs is a plain address-string comparison; there is no
//! signature scheme, networking, or mempool in this ledger.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    Block, Blockchain, BlockchainIterator, ProofOfWork, TXInput, TXOutput, Transaction, SUBSIDY,
    TARGET_BITS,
};
pub use error::{BlockchainError, Result};
pub use utils::{deserialize, serialize, sha256_digest};
