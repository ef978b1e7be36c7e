//! JSON-RPC ledger client
//!
//! `sendTransaction` with local transport retries, then `getSignatureStatuses`
//! polling until the signature settles.

use crate::common::{Result, SolanaRpcClient, SwapError};
use crate::trading::common::SignedTransaction;
use crate::trading::core::params::{ConfirmOptions, SubmitOptions};
use crate::trading::core::traits::LedgerClient;
use crate::trading::core::types::ConfirmationOutcome;
use async_trait::async_trait;
use serde_json::{Value, json};
use solana_rpc_client_api::client_error::{Error as ClientError, ErrorKind as ClientErrorKind};
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_rpc_client_api::request::{RpcError, RpcResponseErrorData};
use solana_sdk::signature::Signature;
use solana_transaction_status::UiTransactionEncoding;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct RpcLedgerClient {
    rpc: Arc<SolanaRpcClient>,
}

impl RpcLedgerClient {
    pub fn new(rpc: Arc<SolanaRpcClient>) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &Arc<SolanaRpcClient> {
        &self.rpc
    }

    async fn check_expired(&self, last_valid_block_height: u64) -> bool {
        match self.rpc.get_block_height().await {
            Ok(height) => height > last_valid_block_height,
            Err(e) => {
                warn!(error = %e, "getBlockHeight failed while confirming");
                false
            },
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn submit(&self, transaction: &SignedTransaction, options: &SubmitOptions) -> Result<Signature> {
        let retry = &options.retry;
        let config = RpcSendTransactionConfig {
            skip_preflight: retry.skip_preflight,
            preflight_commitment: Some(options.preflight_commitment),
            encoding: Some(UiTransactionEncoding::Base64),
            max_retries: Some(retry.max_retries),
            ..Default::default()
        };

        let attempts = retry.transport_attempts.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match self.rpc.send_transaction_with_config(transaction.transaction(), config.clone()).await {
                Ok(signature) => {
                    info!(signature = %signature, attempt, "Transaction submitted");
                    return Ok(signature);
                },
                Err(e) => {
                    if let Some(error) = execution_failure(&e) {
                        return Err(SwapError::TransactionFailed {
                            signature: Some(transaction.signature()),
                            error,
                        });
                    }
                    warn!(attempt, attempts, error = %e, "sendTransaction failed");
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(retry.backoff).await;
                    }
                },
            }
        }

        Err(SwapError::TransportError { attempts, message: last_error })
    }

    async fn confirm(&self, signature: &Signature, options: &ConfirmOptions) -> Result<ConfirmationOutcome> {
        loop {
            match self.rpc.get_signature_statuses(&[*signature]).await {
                Ok(response) => match response.value.into_iter().next().flatten() {
                    Some(status) => {
                        if let Some(err) = &status.err {
                            let error = serde_json::to_value(err)
                                .unwrap_or_else(|_| Value::String(format!("{:?}", err)));
                            return Ok(ConfirmationOutcome::Failed { slot: status.slot, error });
                        }
                        if status.satisfies_commitment(options.commitment) {
                            return Ok(ConfirmationOutcome::Confirmed { slot: status.slot });
                        }
                        debug!(
                            signature = %signature,
                            status = ?status.confirmation_status,
                            "Waiting for commitment"
                        );
                    },
                    None => {
                        if let Some(last_valid) = options.last_valid_block_height {
                            if self.check_expired(last_valid).await {
                                return Ok(ConfirmationOutcome::Expired);
                            }
                        }
                    },
                },
                Err(e) => warn!(signature = %signature, error = %e, "getSignatureStatuses failed"),
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }
}

/// Error payload when the node rejected the transaction on execution grounds
fn execution_failure(error: &ClientError) -> Option<Value> {
    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code,
            message,
            data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
            ..
        }) => Some(json!({
            "code": code,
            "message": message,
            "err": result.err,
            "logs": result.logs,
        })),
        ClientErrorKind::TransactionError(err) => {
            Some(serde_json::to_value(err).unwrap_or_else(|_| Value::String(format!("{:?}", err))))
        },
        _ => None,
    }
}
