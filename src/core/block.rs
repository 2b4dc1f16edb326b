use crate::core::{ProofOfWork, Transaction};
use crate::error::{BlockchainError, Result};
use crate::utils::{deserialize, serialize, sha256_digest};
use log::info;
use serde::{Deserialize, Serialize};

/// A block links to its predecessor by hash and carries a batch of
/// transactions. `hash` and `nonce` are filled in by the proof-of-work
/// engine during construction and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    pre_block_hash: Vec<u8>,
    hash: Vec<u8>,
    transactions: Vec<Transaction>,
    nonce: i64,
}

impl Block {
    pub fn new_block(pre_block_hash: Vec<u8>, transactions: &[Transaction]) -> Result<Block> {
        if transactions.is_empty() {
            return Err(BlockchainError::InvalidBlock(
                "Block must contain at least one transaction".to_string(),
            ));
        }

        let mut block = Block {
            pre_block_hash,
            hash: vec![],
            transactions: transactions.to_vec(),
            nonce: 0,
        };

        let pow = ProofOfWork::new_proof_of_work(block.clone());
        let (nonce, hash) = pow.run()?;
        block.nonce = nonce;
        block.hash = hash;

        Ok(block)
    }

    /// The first block of a chain: empty predecessor hash, a single
    /// coinbase transaction.
    pub fn generate_genesis_block(transaction: &Transaction) -> Result<Block> {
        info!("Mining the genesis block");
        Block::new_block(vec![], &[transaction.clone()])
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_pre_block_hash(&self) -> Vec<u8> {
        self.pre_block_hash.clone()
    }

    pub fn get_hash(&self) -> &[u8] {
        self.hash.as_slice()
    }

    pub fn get_hash_bytes(&self) -> Vec<u8> {
        self.hash.clone()
    }

    pub fn get_nonce(&self) -> i64 {
        self.nonce
    }

    /// The genesis block is the only block with an empty predecessor hash
    pub fn is_genesis(&self) -> bool {
        self.pre_block_hash.is_empty()
    }

    /// Digest of the block's transactions, fed into the proof-of-work data
    pub fn hash_transactions(&self) -> Vec<u8> {
        let mut txhashs = vec![];
        for transaction in &self.transactions {
            txhashs.extend(transaction.get_id());
        }

        sha256_digest(txhashs.as_slice())
    }

    /// Tamper with the stored nonce (for testing only)
    #[cfg(test)]
    pub fn with_nonce(mut self, nonce: i64) -> Block {
        self.nonce = nonce;
        self
    }

    /// Tamper with the stored hash (for testing only)
    #[cfg(test)]
    pub fn with_hash(mut self, hash: Vec<u8>) -> Block {
        self.hash = hash;
        self
    }
}
