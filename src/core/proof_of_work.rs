use crate::core::Block;
use crate::error::{BlockchainError, Result};
use crate::utils::sha256_digest;
use data_encoding::HEXLOWER;
use log::info;
use num_bigint::{BigInt, Sign};
use std::borrow::Borrow;
use std::ops::ShlAssign;

/// Fixed difficulty exponent: a block hash must be below `2^(256 - TARGET_BITS)`
pub const TARGET_BITS: u32 = 12;

const MAX_NONCE: i64 = i64::MAX;

pub struct ProofOfWork {
    block: Block,
    target: BigInt,
}

impl ProofOfWork {
    pub fn new_proof_of_work(block: Block) -> ProofOfWork {
        let mut target = BigInt::from(1);
        target.shl_assign(256 - TARGET_BITS);
        ProofOfWork { block, target }
    }

    /// Recompute the digest from the block's stored nonce and check it
    /// against the target and the stored hash. This is the sole authority
    /// for whether a block was legitimately mined.
    pub fn validate(block: &Block) -> bool {
        let pow = ProofOfWork::new_proof_of_work(block.clone());
        let data = pow.prepare_data(block.get_nonce());
        let hash = sha256_digest(data.as_slice());
        let hash_int = BigInt::from_bytes_be(Sign::Plus, hash.as_slice());

        hash_int < pow.target && hash.as_slice() == block.get_hash()
    }

    fn prepare_data(&self, nonce: i64) -> Vec<u8> {
        let mut data_bytes = vec![];
        data_bytes.extend(self.block.get_pre_block_hash());
        data_bytes.extend(self.block.hash_transactions());
        data_bytes.extend(nonce.to_be_bytes());
        data_bytes.extend(TARGET_BITS.to_be_bytes());
        data_bytes
    }

    /// Search ascending nonces from 0 for a digest below the target.
    /// Deterministic: identical inputs always yield the same nonce.
    pub fn run(&self) -> Result<(i64, Vec<u8>)> {
        let mut nonce = 0;
        while nonce < MAX_NONCE {
            let data = self.prepare_data(nonce);
            let hash = sha256_digest(data.as_slice());
            let hash_int = BigInt::from_bytes_be(Sign::Plus, hash.as_slice());

            if hash_int.lt(self.target.borrow()) {
                info!("Mined block: {}", HEXLOWER.encode(hash.as_slice()));
                return Ok((nonce, hash));
            }
            nonce += 1;
        }
        Err(BlockchainError::MiningExhausted)
    }
}
