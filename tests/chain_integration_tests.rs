//! Chain integration tests
//!
//! Exercises the full ledger flow against temporary stores: chain
//! creation, spending, mining rewards, persistence, and iteration.

use minichain::core::{Blockchain, ProofOfWork, Transaction};
use minichain::error::BlockchainError;
use minichain::SUBSIDY;
use std::collections::HashSet;
use tempfile::tempdir;

fn get_balance(blockchain: &Blockchain, address: &str) -> u64 {
    blockchain
        .find_utxo(address)
        .iter()
        .map(|utxo| utxo.get_value())
        .sum()
}

fn chain_blocks(blockchain: &Blockchain) -> Vec<minichain::Block> {
    let mut blocks = Vec::new();
    let mut iterator = blockchain.iterator();
    while let Some(block) = iterator.next() {
        blocks.push(block);
    }
    blocks
}

#[test]
fn test_create_blockchain_mines_genesis() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    assert_eq!(get_balance(&blockchain, "alice"), SUBSIDY);

    let blocks = chain_blocks(&blockchain);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].is_genesis());
    assert!(ProofOfWork::validate(&blocks[0]));
    assert!(blocks[0].get_transactions()[0].is_coinbase());
}

#[test]
fn test_create_blockchain_twice_fails() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");
    let path = db_path.to_str().unwrap();

    {
        let _blockchain = Blockchain::create_blockchain_with_path("alice", path).unwrap();
    }

    let err = Blockchain::create_blockchain_with_path("bob", path).unwrap_err();
    assert!(matches!(err, BlockchainError::ChainAlreadyExists));
}

#[test]
fn test_resume_missing_chain_fails() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("empty");

    let err = Blockchain::new_blockchain_with_path(db_path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, BlockchainError::ChainNotFound));
}

#[test]
fn test_send_updates_balances() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    let tx = Transaction::new_utxo_transaction("alice", "bob", 30, &blockchain).unwrap();
    blockchain.mine_block(&[tx]).unwrap();

    assert_eq!(get_balance(&blockchain, "alice"), 70);
    assert_eq!(get_balance(&blockchain, "bob"), 30);
    // One coinbase so far, value is conserved
    assert_eq!(
        get_balance(&blockchain, "alice") + get_balance(&blockchain, "bob"),
        SUBSIDY
    );
}

#[test]
fn test_transaction_outputs_match_consumed_inputs() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    let tx = Transaction::new_utxo_transaction("alice", "bob", 30, &blockchain).unwrap();

    // The single 100-coin genesis output is consumed; 30 goes to bob and
    // the 70 remainder comes back to alice as change
    assert!(!tx.is_coinbase());
    assert_eq!(tx.get_vin().len(), 1);
    assert_eq!(tx.get_vout().len(), 2);

    let total_out: u64 = tx.get_vout().iter().map(|out| out.get_value()).sum();
    assert_eq!(total_out, SUBSIDY);
    assert!(tx
        .get_vout()
        .iter()
        .any(|out| out.get_value() == 30 && out.is_locked_with_key("bob")));
    assert!(tx
        .get_vout()
        .iter()
        .any(|out| out.get_value() == 70 && out.is_locked_with_key("alice")));
}

#[test]
fn test_send_without_change_output() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    // Spending the full balance produces no change output
    let tx = Transaction::new_utxo_transaction("alice", "bob", SUBSIDY, &blockchain).unwrap();
    assert_eq!(tx.get_vout().len(), 1);

    blockchain.mine_block(&[tx]).unwrap();
    assert_eq!(get_balance(&blockchain, "alice"), 0);
    assert_eq!(get_balance(&blockchain, "bob"), SUBSIDY);
}

#[test]
fn test_insufficient_funds_rejected() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    let err = Transaction::new_utxo_transaction("alice", "bob", 1000, &blockchain).unwrap_err();
    assert!(matches!(
        err,
        BlockchainError::InsufficientFunds {
            required: 1000,
            available: 100,
        }
    ));

    // The failed spend must not have grown the chain
    assert_eq!(chain_blocks(&blockchain).len(), 1);
    assert_eq!(get_balance(&blockchain, "alice"), SUBSIDY);
}

#[test]
fn test_mining_reward_adds_subsidy() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    let coinbase = Transaction::new_coinbase_tx("alice", "Mining reward").unwrap();
    blockchain.mine_block(&[coinbase]).unwrap();

    assert_eq!(get_balance(&blockchain, "alice"), 2 * SUBSIDY);
}

#[test]
fn test_end_to_end_scenario() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    // createblockchain -address alice
    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();
    assert_eq!(get_balance(&blockchain, "alice"), 100);

    // send -from alice -to bob -amount 30
    let tx = Transaction::new_utxo_transaction("alice", "bob", 30, &blockchain).unwrap();
    blockchain.mine_block(&[tx]).unwrap();
    assert_eq!(get_balance(&blockchain, "alice"), 70);
    assert_eq!(get_balance(&blockchain, "bob"), 30);

    // mine -address alice
    let coinbase = Transaction::new_coinbase_tx("alice", "Mining reward").unwrap();
    blockchain.mine_block(&[coinbase]).unwrap();
    assert_eq!(get_balance(&blockchain, "alice"), 170);
    assert_eq!(get_balance(&blockchain, "bob"), 30);

    // printchain: three blocks tip to genesis, all valid
    let blocks = chain_blocks(&blockchain);
    assert_eq!(blocks.len(), 3);
    for block in &blocks {
        assert!(ProofOfWork::validate(block));
    }
    assert!(blocks.last().unwrap().is_genesis());

    // Two coinbase transactions ever appended, value conserved
    assert_eq!(
        get_balance(&blockchain, "alice") + get_balance(&blockchain, "bob"),
        2 * SUBSIDY
    );
}

#[test]
fn test_iteration_visits_each_block_once() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();
    for _ in 0..3 {
        let tx = Transaction::new_utxo_transaction("alice", "bob", 10, &blockchain).unwrap();
        blockchain.mine_block(&[tx]).unwrap();
    }

    let blocks = chain_blocks(&blockchain);
    assert_eq!(blocks.len(), 4);

    let unique_hashes: HashSet<Vec<u8>> = blocks.iter().map(|b| b.get_hash_bytes()).collect();
    assert_eq!(unique_hashes.len(), 4);

    // Newest to oldest: every block points at the one after it,
    // and only the last one is the genesis block
    assert_eq!(blocks[0].get_hash_bytes(), blockchain.get_tip_hash());
    for pair in blocks.windows(2) {
        assert_eq!(pair[0].get_pre_block_hash(), pair[1].get_hash_bytes());
        assert!(!pair[0].is_genesis());
    }
    assert!(blocks.last().unwrap().is_genesis());
}

#[test]
fn test_iterator_is_single_pass() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    let mut iterator = blockchain.iterator();
    assert!(iterator.next().is_some());
    assert!(iterator.next().is_none());
    assert!(iterator.next().is_none());

    // A fresh iterator starts over at the tip
    let mut fresh = blockchain.iterator();
    assert!(fresh.next().is_some());
}

#[test]
fn test_persistence_round_trip() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");
    let path = db_path.to_str().unwrap();

    let tip_before;
    {
        let blockchain = Blockchain::create_blockchain_with_path("alice", path).unwrap();
        let tx = Transaction::new_utxo_transaction("alice", "bob", 30, &blockchain).unwrap();
        blockchain.mine_block(&[tx]).unwrap();
        tip_before = blockchain.get_tip_hash();
    }

    let blockchain = Blockchain::new_blockchain_with_path(path).unwrap();
    assert_eq!(blockchain.get_tip_hash(), tip_before);
    assert_eq!(get_balance(&blockchain, "alice"), 70);
    assert_eq!(get_balance(&blockchain, "bob"), 30);

    // Blocks read back from storage still validate
    for block in chain_blocks(&blockchain) {
        assert!(ProofOfWork::validate(&block));
    }
}

#[test]
fn test_spendable_outputs_cover_amount() {
    let temp_dir = tempdir().unwrap();
    let db_path = temp_dir.path().join("chain");

    let blockchain =
        Blockchain::create_blockchain_with_path("alice", db_path.to_str().unwrap()).unwrap();

    let (accumulated, outputs) = blockchain.find_spendable_outputs("alice", 30);
    assert!(accumulated >= 30);
    assert_eq!(outputs.len(), 1);

    let (accumulated, outputs) = blockchain.find_spendable_outputs("bob", 1);
    assert_eq!(accumulated, 0);
    assert!(outputs.is_empty());
}
