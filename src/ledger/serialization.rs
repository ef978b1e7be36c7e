//! Transaction serialization
//!
//! bincode wire encoding of versioned transactions, in base58 or base64 text.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::UiTransactionEncoding;

/// Serialize and encode a transaction
pub fn encode_transaction(
    transaction: &VersionedTransaction,
    encoding: UiTransactionEncoding,
) -> Result<String> {
    let serialized = bincode::serialize(transaction).context("Failed to serialize transaction")?;

    match encoding {
        UiTransactionEncoding::Base58 => Ok(bs58::encode(&serialized).into_string()),
        UiTransactionEncoding::Base64 => Ok(STANDARD.encode(&serialized)),
        other => anyhow::bail!("Unsupported encoding: {:?}", other),
    }
}

/// Decode a base64 transaction, returning it with its raw bytes
pub fn decode_base64_transaction(encoded: &str) -> Result<(VersionedTransaction, Vec<u8>)> {
    let bytes = STANDARD.decode(encoded.trim()).context("Transaction is not valid base64")?;
    let transaction = deserialize_transaction(&bytes)?;
    Ok((transaction, bytes))
}

pub fn deserialize_transaction(bytes: &[u8]) -> Result<VersionedTransaction> {
    bincode::deserialize::<VersionedTransaction>(bytes)
        .context("Bytes are not a bincode VersionedTransaction")
}
