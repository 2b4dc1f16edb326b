// The persistent chain store. Sled holds every block keyed by its hash
// plus a reserved entry pointing at the current tip; balances are derived
// by scanning the chain backwards from the tip.

use crate::config::GLOBAL_CONFIG;
use crate::core::{Block, TXOutput, Transaction};
use crate::error::{BlockchainError, Result};
use data_encoding::HEXLOWER;
use log::info;
use sled::{Db, Tree};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

// Reserved tip key: at 14 bytes it can never collide with a 32-byte block hash
const TIP_BLOCK_HASH_KEY: &str = "tip_block_hash";
const BLOCKS_TREE: &str = "blocks";

const GENESIS_COINBASE_NOTE: &str = "First Transaction from Genesis";

/// Handle to one linear chain backed by an exclusive sled database.
/// Dropping the handle releases the store's file lock, so every command
/// holds it for exactly one scoped operation.
#[derive(Clone, Debug)]
pub struct Blockchain {
    tip_hash: Arc<RwLock<Vec<u8>>>,
    db: Db,
}

impl Blockchain {
    /// Create a brand new chain in the default data directory, mining the
    /// genesis block with a coinbase paying `genesis_address`.
    pub fn create_blockchain(genesis_address: &str) -> Result<Blockchain> {
        Self::create_blockchain_with_path(genesis_address, &GLOBAL_CONFIG.get_data_dir())
    }

    /// Resume the chain in the default data directory.
    pub fn new_blockchain() -> Result<Blockchain> {
        Self::new_blockchain_with_path(&GLOBAL_CONFIG.get_data_dir())
    }

    pub fn create_blockchain_with_path(genesis_address: &str, db_path: &str) -> Result<Blockchain> {
        let db = sled::open(db_path)?;
        let blocks_tree = db
            .open_tree(BLOCKS_TREE)
            .map_err(|e| BlockchainError::Database(format!("Failed to open blocks tree: {e}")))?;

        let data = blocks_tree
            .get(TIP_BLOCK_HASH_KEY)
            .map_err(|e| BlockchainError::Database(format!("Failed to get tip hash: {e}")))?;
        if data.is_some() {
            return Err(BlockchainError::ChainAlreadyExists);
        }

        info!("Creating genesis block for address: {genesis_address}");
        let coinbase_tx = Transaction::new_coinbase_tx(genesis_address, GENESIS_COINBASE_NOTE)?;
        let block = Block::generate_genesis_block(&coinbase_tx)?;
        Self::update_blocks_tree(&blocks_tree, &block)?;

        Ok(Blockchain {
            tip_hash: Arc::new(RwLock::new(block.get_hash_bytes())),
            db,
        })
    }

    pub fn new_blockchain_with_path(db_path: &str) -> Result<Blockchain> {
        let db = sled::open(db_path)?;
        let blocks_tree = db
            .open_tree(BLOCKS_TREE)
            .map_err(|e| BlockchainError::Database(format!("Failed to open blocks tree: {e}")))?;

        let tip_bytes = blocks_tree
            .get(TIP_BLOCK_HASH_KEY)
            .map_err(|e| BlockchainError::Database(format!("Failed to get tip hash: {e}")))?
            .ok_or(BlockchainError::ChainNotFound)?;

        Ok(Blockchain {
            tip_hash: Arc::new(RwLock::new(tip_bytes.to_vec())),
            db,
        })
    }

    // Inserting the block and moving the tip happen in one sled transaction,
    // so the store never points at a missing block.
    fn update_blocks_tree(blocks_tree: &Tree, block: &Block) -> Result<()> {
        let block_hash = block.get_hash();
        let block_data = block.serialize()?;

        blocks_tree
            .transaction(|tx_db| {
                tx_db.insert(block_hash, block_data.as_slice())?;
                tx_db.insert(TIP_BLOCK_HASH_KEY, block_hash)?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError| {
                BlockchainError::Database(format!("Failed to update blocks tree: {e}"))
            })?;

        Ok(())
    }

    pub fn get_tip_hash(&self) -> Vec<u8> {
        self.tip_hash
            .read()
            .expect("Failed to acquire read lock on tip_hash - this should never happen")
            .clone()
    }

    fn set_tip_hash(&self, new_tip_hash: &[u8]) {
        let mut tip_hash = self
            .tip_hash
            .write()
            .expect("Failed to acquire write lock on tip_hash - this should never happen");
        *tip_hash = new_tip_hash.to_vec();
    }

    /// Mine a new block holding `transactions` on top of the current tip
    /// and append it to the store.
    pub fn mine_block(&self, transactions: &[Transaction]) -> Result<Block> {
        info!("Mining block with {} transactions", transactions.len());

        let block = Block::new_block(self.get_tip_hash(), transactions)?;
        let block_hash = block.get_hash_bytes();

        let blocks_tree = self
            .db
            .open_tree(BLOCKS_TREE)
            .map_err(|e| BlockchainError::Database(format!("Failed to open blocks tree: {e}")))?;
        Self::update_blocks_tree(&blocks_tree, &block)?;
        self.set_tip_hash(&block_hash);

        info!("Successfully mined block: {}", HEXLOWER.encode(&block_hash));
        Ok(block)
    }

    pub fn iterator(&self) -> BlockchainIterator {
        BlockchainIterator::new(self.get_tip_hash(), self.db.clone())
    }

    /// Collect the unspent outputs owned by `address` with a single
    /// backward pass over the chain. Inputs spending an output always sit
    /// at the same height or later than the output itself, so every spend
    /// is registered before its output is visited.
    pub fn find_utxo(&self, address: &str) -> Vec<TXOutput> {
        let mut utxos: Vec<TXOutput> = vec![];
        let mut spent_txos: HashMap<String, Vec<i64>> = HashMap::new();

        let mut iterator = self.iterator();
        while let Some(block) = iterator.next() {
            for tx in block.get_transactions() {
                let txid_hex = HEXLOWER.encode(tx.get_id());

                'outputs: for (idx, out) in tx.get_vout().iter().enumerate() {
                    if let Some(outs) = spent_txos.get(txid_hex.as_str()) {
                        for spent_out_idx in outs {
                            if (idx as i64).eq(spent_out_idx) {
                                continue 'outputs;
                            }
                        }
                    }
                    if out.is_locked_with_key(address) {
                        utxos.push(out.clone());
                    }
                }

                // Coinbase inputs reference nothing and never spend outputs
                if tx.is_coinbase() {
                    continue;
                }

                for txin in tx.get_vin() {
                    let in_txid_hex = HEXLOWER.encode(txin.get_txid());
                    if let Some(spent_list) = spent_txos.get_mut(in_txid_hex.as_str()) {
                        spent_list.push(txin.get_vout());
                    } else {
                        spent_txos.insert(in_txid_hex, vec![txin.get_vout()]);
                    }
                }
            }
        }
        utxos
    }

    /// Same scan as [`find_utxo`](Self::find_utxo), but stops accumulating
    /// once the running total covers `amount`. Returns the accumulated total
    /// and the consumable outputs keyed by txid hex.
    pub fn find_spendable_outputs(
        &self,
        address: &str,
        amount: u64,
    ) -> (u64, HashMap<String, Vec<i64>>) {
        let mut unspent_outputs: HashMap<String, Vec<i64>> = HashMap::new();
        let mut spent_txos: HashMap<String, Vec<i64>> = HashMap::new();
        let mut accumulated = 0;

        let mut iterator = self.iterator();
        'scan: while let Some(block) = iterator.next() {
            for tx in block.get_transactions() {
                let txid_hex = HEXLOWER.encode(tx.get_id());

                'outputs: for (idx, out) in tx.get_vout().iter().enumerate() {
                    if let Some(outs) = spent_txos.get(txid_hex.as_str()) {
                        for spent_out_idx in outs {
                            if (idx as i64).eq(spent_out_idx) {
                                continue 'outputs;
                            }
                        }
                    }
                    if out.is_locked_with_key(address) && accumulated < amount {
                        accumulated += out.get_value();
                        if let Some(output_list) = unspent_outputs.get_mut(txid_hex.as_str()) {
                            output_list.push(idx as i64);
                        } else {
                            unspent_outputs.insert(txid_hex.clone(), vec![idx as i64]);
                        }
                        if accumulated >= amount {
                            break 'scan;
                        }
                    }
                }

                if tx.is_coinbase() {
                    continue;
                }

                for txin in tx.get_vin() {
                    let in_txid_hex = HEXLOWER.encode(txin.get_txid());
                    if let Some(spent_list) = spent_txos.get_mut(in_txid_hex.as_str()) {
                        spent_list.push(txin.get_vout());
                    } else {
                        spent_txos.insert(in_txid_hex, vec![txin.get_vout()]);
                    }
                }
            }
        }
        (accumulated, unspent_outputs)
    }
}

/// Single-pass cursor from the tip back to the genesis block. The cursor
/// goes empty after yielding the genesis block; build a fresh iterator to
/// traverse again.
pub struct BlockchainIterator {
    db: Db,
    current_hash: Vec<u8>,
}

impl BlockchainIterator {
    fn new(tip_hash: Vec<u8>, db: Db) -> BlockchainIterator {
        BlockchainIterator {
            current_hash: tip_hash,
            db,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Block> {
        let block_tree = self.db.open_tree(BLOCKS_TREE).ok()?;
        let data = block_tree.get(self.current_hash.as_slice()).ok()??;
        let block = Block::deserialize(data.to_vec().as_slice()).ok()?;
        self.current_hash = block.get_pre_block_hash();
        Some(block)
    }
}
