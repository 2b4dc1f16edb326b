//! Error handling for the ledger
//!
//! This module provides the error types for all ledger operations.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Error types for ledger operations
#[derive(Debug, Clone)]
pub enum BlockchainError {
    /// Underlying store read/write/open failure
    Database(String),
    /// Another process holds the store's exclusive file lock
    DatabaseLocked,
    /// A blockchain already exists in the target store
    ChainAlreadyExists,
    /// No blockchain exists in the target store
    ChainNotFound,
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Missing or malformed command input
    InvalidArguments(String),
    /// Requested spend exceeds the computed balance
    InsufficientFunds { required: u64, available: u64 },
    /// The nonce space was exhausted without finding a valid hash
    MiningExhausted,
    /// Transaction construction errors
    Transaction(String),
    /// Block construction errors
    InvalidBlock(String),
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::Database(msg) => write!(f, "Database error: {msg}"),
            BlockchainError::DatabaseLocked => {
                write!(f, "Database is locked by another process")
            }
            BlockchainError::ChainAlreadyExists => {
                write!(f, "Blockchain already exists")
            }
            BlockchainError::ChainNotFound => {
                write!(f, "No existing blockchain found. Create one first.")
            }
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            BlockchainError::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds: required {required}, available {available}"
                )
            }
            BlockchainError::MiningExhausted => {
                write!(f, "Mining failed: nonce space exhausted")
            }
            BlockchainError::Transaction(msg) => write!(f, "Transaction error: {msg}"),
            BlockchainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<sled::Error> for BlockchainError {
    fn from(err: sled::Error) -> Self {
        // sled surfaces lock contention as an I/O error on open
        match err {
            sled::Error::Io(ref io)
                if io.kind() == std::io::ErrorKind::WouldBlock
                    || io.to_string().contains("lock") =>
            {
                BlockchainError::DatabaseLocked
            }
            other => BlockchainError::Database(other.to_string()),
        }
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}
