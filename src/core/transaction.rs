// Transactions follow the UTXO model: each one consumes previous outputs
// and creates new ones. Ownership is a plain address-string comparison;
// there is no signature scheme in this ledger.

use crate::core::Blockchain;
use crate::error::{BlockchainError, Result};
use crate::utils::{deserialize, serialize, sha256_digest};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// Reward paid by every coinbase transaction
pub const SUBSIDY: u64 = 100;

// A transaction input references a previous transaction output.
// A coinbase input references nothing: its txid is empty and its
// output index is -1.
#[derive(Debug, Clone, Default, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TXInput {
    txid: Vec<u8>,
    vout: i64,
    script_sig: String,
}

impl TXInput {
    pub fn new(txid: &[u8], vout: i64, script_sig: &str) -> TXInput {
        TXInput {
            txid: txid.to_vec(),
            vout,
            script_sig: String::from(script_sig),
        }
    }

    pub fn get_txid(&self) -> &[u8] {
        self.txid.as_slice()
    }

    pub fn get_vout(&self) -> i64 {
        self.vout
    }

    pub fn get_script_sig(&self) -> &str {
        self.script_sig.as_str()
    }

    /// Whether this input claims to be spendable by `address`
    pub fn can_unlock(&self, address: &str) -> bool {
        self.script_sig == address
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TXOutput {
    value: u64,
    pub_key_hash: String,
}

impl TXOutput {
    pub fn new(value: u64, address: &str) -> TXOutput {
        TXOutput {
            value,
            pub_key_hash: String::from(address),
        }
    }

    pub fn get_value(&self) -> u64 {
        self.value
    }

    pub fn get_pub_key_hash(&self) -> &str {
        self.pub_key_hash.as_str()
    }

    pub fn is_locked_with_key(&self, address: &str) -> bool {
        self.pub_key_hash == address
    }
}

/// A transfer of value: inputs consumed, outputs created.
/// The id is the digest of the serialized inputs and outputs and is
/// computed only after both are finalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    id: Vec<u8>,
    vin: Vec<TXInput>,
    vout: Vec<TXOutput>,
}

impl Transaction {
    /// Create a coinbase transaction: one sentinel input carrying `note`
    /// and one output paying the fixed subsidy to `to`.
    pub fn new_coinbase_tx(to: &str, note: &str) -> Result<Transaction> {
        let tx_input = TXInput {
            txid: vec![],
            vout: -1,
            script_sig: String::from(note),
        };
        let tx_output = TXOutput::new(SUBSIDY, to);

        let mut tx = Transaction {
            id: vec![],
            vin: vec![tx_input],
            vout: vec![tx_output],
        };
        tx.id = tx.hash()?;
        Ok(tx)
    }

    /// Build a transaction spending `amount` from `from` to `to`, returning
    /// any remainder to `from` as a change output.
    pub fn new_utxo_transaction(
        from: &str,
        to: &str,
        amount: u64,
        blockchain: &Blockchain,
    ) -> Result<Transaction> {
        if amount == 0 {
            return Err(BlockchainError::Transaction(
                "Amount must be positive".to_string(),
            ));
        }

        let (accumulated, valid_outputs) = blockchain.find_spendable_outputs(from, amount);
        if accumulated < amount {
            return Err(BlockchainError::InsufficientFunds {
                required: amount,
                available: accumulated,
            });
        }

        let mut inputs = vec![];
        for (txid_hex, outs) in valid_outputs {
            let txid = HEXLOWER.decode(txid_hex.as_bytes()).map_err(|e| {
                BlockchainError::Transaction(format!("Invalid transaction ID: {e}"))
            })?;
            for out in outs {
                inputs.push(TXInput::new(txid.as_slice(), out, from));
            }
        }

        let mut outputs = vec![TXOutput::new(amount, to)];
        if accumulated > amount {
            outputs.push(TXOutput::new(accumulated - amount, from)); // Change output
        }

        let mut tx = Transaction {
            id: vec![],
            vin: inputs,
            vout: outputs,
        };
        tx.id = tx.hash()?;
        Ok(tx)
    }

    /// A coinbase transaction has exactly one input with the sentinel values
    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1 && self.vin[0].txid.is_empty() && self.vin[0].vout == -1
    }

    fn hash(&self) -> Result<Vec<u8>> {
        let tx_copy = Transaction {
            id: vec![],
            vin: self.vin.clone(),
            vout: self.vout.clone(),
        };
        Ok(sha256_digest(tx_copy.serialize()?.as_slice()))
    }

    pub fn get_id(&self) -> &[u8] {
        self.id.as_slice()
    }

    pub fn get_vin(&self) -> &[TXInput] {
        self.vin.as_slice()
    }

    pub fn get_vout(&self) -> &[TXOutput] {
        self.vout.as_slice()
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Transaction> {
        deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coinbase_structure() {
        let tx = Transaction::new_coinbase_tx("alice", "Mining reward").unwrap();

        assert!(tx.is_coinbase());
        assert_eq!(tx.get_vin().len(), 1);
        assert!(tx.get_vin()[0].get_txid().is_empty());
        assert_eq!(tx.get_vin()[0].get_vout(), -1);
        assert_eq!(tx.get_vin()[0].get_script_sig(), "Mining reward");

        assert_eq!(tx.get_vout().len(), 1);
        assert_eq!(tx.get_vout()[0].get_value(), SUBSIDY);
        assert!(tx.get_vout()[0].is_locked_with_key("alice"));

        assert!(!tx.get_id().is_empty());
    }

    #[test]
    fn test_coinbase_id_depends_on_contents() {
        let genesis = Transaction::new_coinbase_tx("alice", "First Transaction from Genesis")
            .unwrap();
        let reward = Transaction::new_coinbase_tx("alice", "Mining reward").unwrap();
        assert_ne!(genesis.get_id(), reward.get_id());
    }

    #[test]
    fn test_output_locking() {
        let out = TXOutput::new(30, "bob");
        assert!(out.is_locked_with_key("bob"));
        assert!(!out.is_locked_with_key("alice"));
    }

    #[test]
    fn test_input_unlocking() {
        let input = TXInput::new(b"some-txid", 0, "alice");
        assert!(input.can_unlock("alice"));
        assert!(!input.can_unlock("bob"));
        assert!(!input.can_unlock(""));
    }
}
