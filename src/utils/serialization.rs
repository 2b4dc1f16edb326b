// Bincode 2.x helpers shared by block and transaction storage
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Serialize data using bincode 2.0 with standard configuration
pub fn serialize<T: Serialize + bincode::Encode>(data: &T) -> Result<Vec<u8>> {
    let config = bincode::config::standard();
    Ok(bincode::encode_to_vec(data, config)?)
}

/// Deserialize data using bincode 2.0 with standard configuration
pub fn deserialize<T>(bytes: &[u8]) -> Result<T>
where
    T: for<'de> Deserialize<'de> + bincode::Decode<()>,
{
    let config = bincode::config::standard();
    let (data, _) = bincode::decode_from_slice(bytes, config)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Transaction, TXOutput};

    #[test]
    fn test_transaction_round_trip() {
        let tx = Transaction::new_coinbase_tx("miner-address", "round trip").unwrap();

        let bytes = tx.serialize().expect("Serialization should work");
        let decoded = Transaction::deserialize(&bytes).expect("Deserialization should work");

        assert_eq!(tx.get_id(), decoded.get_id());
        assert_eq!(tx.get_vout().len(), decoded.get_vout().len());
    }

    #[test]
    fn test_output_round_trip() {
        let out = TXOutput::new(70, "change-address");
        let bytes = serialize(&out).unwrap();
        let decoded: TXOutput = deserialize(&bytes).unwrap();
        assert_eq!(decoded.get_value(), 70);
        assert!(decoded.is_locked_with_key("change-address"));
    }

    #[test]
    fn test_deserialize_invalid_data() {
        let invalid_bytes = vec![0xFF, 0xFF, 0xFF, 0xFF];
        let result: Result<Transaction> = deserialize(&invalid_bytes);
        assert!(result.is_err());
    }
}
