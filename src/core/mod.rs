//! Core ledger functionality
//!
//! This module contains the fundamental chain components: blocks,
//! transactions, the persistent chain store, and proof-of-work consensus.

pub mod block;
pub mod blockchain;
pub mod proof_of_work;
pub mod transaction;

pub use block::Block;
pub use blockchain::{Blockchain, BlockchainIterator};
pub use proof_of_work::{ProofOfWork, TARGET_BITS};
pub use transaction::{TXInput, TXOutput, Transaction, SUBSIDY};
