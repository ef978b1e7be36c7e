use crate::common::{Result, SwapError};
use crate::ledger::serialization::{decode_base64_transaction, deserialize_transaction, encode_transaction};
use serde_json::Value;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::VersionedTransaction,
};
use solana_transaction_status::UiTransactionEncoding;

/// Unsigned swap transaction as produced by the builder
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransaction {
    bytes: Vec<u8>,
    last_valid_block_height: u64,
    prioritization_fee_lamports: u64,
    compute_unit_limit: u32,
    simulation_error: Option<Value>,
}

impl UnsignedTransaction {
    pub fn new(bytes: Vec<u8>, last_valid_block_height: u64) -> Self {
        Self {
            bytes,
            last_valid_block_height,
            prioritization_fee_lamports: 0,
            compute_unit_limit: 0,
            simulation_error: None,
        }
    }

    /// Decode a base64 bincode transaction; the payload must deserialize.
    pub fn from_base64(encoded: &str, last_valid_block_height: u64) -> anyhow::Result<Self> {
        let (_, bytes) = decode_base64_transaction(encoded)?;
        Ok(Self::new(bytes, last_valid_block_height))
    }

    pub fn with_fee_estimate(mut self, prioritization_fee_lamports: u64, compute_unit_limit: u32) -> Self {
        self.prioritization_fee_lamports = prioritization_fee_lamports;
        self.compute_unit_limit = compute_unit_limit;
        self
    }

    pub fn with_simulation_error(mut self, simulation_error: Option<Value>) -> Self {
        self.simulation_error = simulation_error.filter(|v| !v.is_null());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    pub fn prioritization_fee_lamports(&self) -> u64 {
        self.prioritization_fee_lamports
    }

    pub fn compute_unit_limit(&self) -> u32 {
        self.compute_unit_limit
    }

    pub fn simulation_error(&self) -> Option<&Value> {
        self.simulation_error.as_ref()
    }

    /// `SimulationFailed` when the builder's simulation rejected this transaction
    pub fn ensure_simulation_passed(&self) -> Result<()> {
        match &self.simulation_error {
            Some(error) => Err(SwapError::SimulationFailed {
                message: simulation_error_message(error),
                details: Some(error.clone()),
            }),
            None => Ok(()),
        }
    }
}

fn simulation_error_message(error: &Value) -> String {
    let text = error.get("error").and_then(Value::as_str);
    let code = error.get("errorCode").and_then(Value::as_str);
    match (text, code) {
        (Some(text), Some(code)) => format!("{} ({})", text, code),
        (Some(text), None) => text.to_string(),
        _ => error.to_string(),
    }
}

/// Transaction carrying the signer's signature, ready for submission
#[derive(Debug)]
pub struct SignedTransaction {
    transaction: VersionedTransaction,
    signature: Signature,
    last_valid_block_height: u64,
}

impl SignedTransaction {
    /// The first signature is the transaction id
    pub fn new(transaction: VersionedTransaction, last_valid_block_height: u64) -> Self {
        let signature = transaction.signatures.first().copied().unwrap_or_default();
        Self { transaction, signature, last_valid_block_height }
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn transaction(&self) -> &VersionedTransaction {
        &self.transaction
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    pub fn to_base64(&self) -> anyhow::Result<String> {
        encode_transaction(&self.transaction, UiTransactionEncoding::Base64)
    }
}

/// Sign a built transaction with a local keypair.
///
/// The signature goes into the slot matching the keypair's position among the
/// message's required signers; other slots are left as received.
pub fn sign_unsigned(unsigned: &UnsignedTransaction, keypair: &Keypair) -> Result<SignedTransaction> {
    unsigned.ensure_simulation_passed()?;

    let mut transaction = deserialize_transaction(unsigned.bytes())
        .map_err(|e| SwapError::SigningFailed(format!("{:#}", e)))?;

    let signer = keypair.pubkey();
    let index = signer_index(&transaction, &signer).ok_or_else(|| {
        SwapError::SigningFailed(format!("{} is not a required signer of the transaction", signer))
    })?;

    let required = usize::from(transaction.message.header().num_required_signatures);
    if transaction.signatures.len() < required {
        transaction.signatures.resize(required, Signature::default());
    }

    let message_bytes = transaction.message.serialize();
    let signature = keypair
        .try_sign_message(&message_bytes)
        .map_err(|e| SwapError::SigningFailed(e.to_string()))?;
    transaction.signatures[index] = signature;

    Ok(SignedTransaction::new(transaction, unsigned.last_valid_block_height()))
}

fn signer_index(transaction: &VersionedTransaction, signer: &Pubkey) -> Option<usize> {
    let required = usize::from(transaction.message.header().num_required_signatures);
    transaction
        .message
        .static_account_keys()
        .iter()
        .take(required)
        .position(|key| key == signer)
}
