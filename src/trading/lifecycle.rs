//! Transaction lifecycle callbacks
//!
//! Hook invoked once a swap transaction is signed and before it is submitted,
//! e.g. to persist or audit the exact bytes that will hit the network.

use crate::ledger::serialization::encode_transaction;
use anyhow::Result;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::UiTransactionEncoding;
use std::sync::Arc;
use tracing::warn;

pub trait TransactionLifecycleCallback: Send + Sync {
    /// Called after signing, before submission.
    ///
    /// An `Err` is logged and the swap continues.
    fn on_transaction_signed(
        &self,
        context: CallbackContext,
    ) -> futures::future::BoxFuture<'static, Result<()>>;
}

/// Snapshot of a signed swap handed to the callback
#[derive(Clone)]
pub struct CallbackContext {
    /// Signed transaction, byte-identical to what gets submitted
    pub transaction: VersionedTransaction,

    /// Base-58 first signature
    pub signature: String,

    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub in_amount: u64,
    /// Quoted output before slippage
    pub out_amount: u64,

    /// Unix time in nanoseconds
    pub timestamp_ns: u64,
}

impl CallbackContext {
    pub fn new(
        transaction: VersionedTransaction,
        input_mint: Pubkey,
        output_mint: Pubkey,
        in_amount: u64,
        out_amount: u64,
    ) -> Self {
        let signature = transaction
            .signatures
            .first()
            .map(|sig| sig.to_string())
            .unwrap_or_else(|| {
                warn!("Transaction has no signature, using empty string");
                String::new()
            });

        let timestamp_ns = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_else(|e| {
                warn!("System time before UNIX epoch: {}", e);
                std::time::Duration::from_secs(0)
            })
            .as_nanos() as u64;

        Self { transaction, signature, input_mint, output_mint, in_amount, out_amount, timestamp_ns }
    }

    /// Base64 wire encoding of the transaction
    pub fn to_base64(&self) -> String {
        encode_transaction(&self.transaction, UiTransactionEncoding::Base64).unwrap_or_else(|e| {
            warn!("Failed to encode transaction as base64: {}", e);
            String::new()
        })
    }

    /// JSON view for logging
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "signature": self.signature,
            "input_mint": self.input_mint.to_string(),
            "output_mint": self.output_mint.to_string(),
            "in_amount": self.in_amount.to_string(),
            "out_amount": self.out_amount.to_string(),
            "timestamp_ns": self.timestamp_ns,
            "transaction_base64": self.to_base64(),
        })
    }
}

#[derive(Clone)]
pub struct NoopCallback;

impl TransactionLifecycleCallback for NoopCallback {
    fn on_transaction_signed(
        &self,
        _context: CallbackContext,
    ) -> futures::future::BoxFuture<'static, Result<()>> {
        Box::pin(async { Ok(()) })
    }
}

pub type CallbackRef = Arc<dyn TransactionLifecycleCallback>;
