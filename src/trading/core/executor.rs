//! Swap orchestrator
//!
//! Drives one swap through quote, build, sign, submit and confirm. Each call
//! is a single sequential traversal; nothing is retried or re-quoted here.

use crate::common::{Result, SwapError, SwapPolicy};
use crate::trading::common::{SignedTransaction, UnsignedTransaction, parse_mint};
use crate::trading::core::params::{
    BuildOptions, ConfirmOptions, SubmitOptions, SwapParams, SwapRequest,
};
use crate::trading::core::traits::{
    LedgerClient, QuoteProvider, TransactionBuilder, TransactionSigner,
};
use crate::trading::core::types::{
    ConfirmationOutcome, ConfirmationStatus, PreparedSwap, Quote, SwapResult, SwapStage,
};
use crate::trading::lifecycle::{CallbackContext, CallbackRef};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct SwapOrchestrator {
    quotes: Arc<dyn QuoteProvider>,
    builder: Arc<dyn TransactionBuilder>,
    signer: Arc<dyn TransactionSigner>,
    ledger: Arc<dyn LedgerClient>,
    policy: SwapPolicy,
    commitment: CommitmentConfig,
    on_transaction_signed: Option<CallbackRef>,
}

impl SwapOrchestrator {
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        builder: Arc<dyn TransactionBuilder>,
        signer: Arc<dyn TransactionSigner>,
        ledger: Arc<dyn LedgerClient>,
        policy: SwapPolicy,
    ) -> Self {
        Self {
            quotes,
            builder,
            signer,
            ledger,
            policy,
            commitment: CommitmentConfig::confirmed(),
            on_transaction_signed: None,
        }
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_callback(mut self, callback: CallbackRef) -> Self {
        self.on_transaction_signed = Some(callback);
        self
    }

    pub fn policy(&self) -> &SwapPolicy {
        &self.policy
    }

    /// Whether a signing key is loaded
    pub fn can_execute(&self) -> bool {
        self.signer.is_ready()
    }

    /// Price a swap without touching the wallet
    pub async fn get_quote(&self, params: &SwapParams) -> Result<Quote> {
        let request = SwapRequest::from_params(params, &self.policy)?;
        self.quote(&request).await
    }

    /// Quote and build an unsigned transaction for signing elsewhere.
    ///
    /// The custodian's identity is used when a key is loaded, otherwise
    /// `user_public_key` must name the fee payer.
    pub async fn prepare_swap(
        &self,
        params: &SwapParams,
        user_public_key: Option<&str>,
    ) -> Result<PreparedSwap> {
        let request = SwapRequest::from_params(params, &self.policy)?;
        let user = match (self.signer.public_identity(), user_public_key) {
            (Some(identity), _) => identity,
            (None, Some(value)) => parse_mint(value)?,
            (None, None) => return Err(SwapError::NoSignerAvailable),
        };

        let quote = self.quote(&request).await?;
        let transaction = self.build(&quote, &user).await?;
        Ok(PreparedSwap { quote, transaction, user_public_key: user })
    }

    /// Run the full pipeline for one swap
    pub async fn execute_swap(&self, params: &SwapParams) -> Result<SwapResult> {
        let started = Instant::now();
        let mut stage = SwapStage::Validating;

        let result = self.run(params, &mut stage).await;
        match &result {
            Ok(swap) => info!(
                stage = %SwapStage::Succeeded,
                signature = %swap.signature,
                status = %swap.confirmation_status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Swap finished"
            ),
            Err(err) => warn!(
                stage = %SwapStage::Failed,
                failed_at = %stage,
                kind = %err.kind(),
                possibly_landed = err.is_possibly_landed(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "Swap failed"
            ),
        }
        result
    }

    async fn run(&self, params: &SwapParams, stage: &mut SwapStage) -> Result<SwapResult> {
        let request = SwapRequest::from_params(params, &self.policy)?;
        // No network call is made without a key to sign with
        if !self.signer.is_ready() {
            return Err(SwapError::WalletNotInitialized);
        }
        let user = self.signer.public_identity().ok_or(SwapError::WalletNotInitialized)?;
        let wait_for_confirmation =
            params.wait_for_confirmation.unwrap_or(self.policy.wait_for_confirmation);

        *stage = SwapStage::Quoting;
        let quote = self.quote(&request).await?;

        *stage = SwapStage::Building;
        let unsigned = self.build(&quote, &user).await?;

        *stage = SwapStage::Signing;
        debug!(stage = %stage, wallet = %user, "Signing swap transaction");
        let signed = self.signer.sign(&unsigned)?;
        self.notify_signed(&signed, &quote).await;

        *stage = SwapStage::Submitting;
        let signature = self.submit(&signed).await?;

        let mut result = SwapResult {
            signature,
            confirmation_status: ConfirmationStatus::Pending,
            input_mint: quote.input_mint,
            output_mint: quote.output_mint,
            in_amount: quote.in_amount,
            out_amount: quote.out_amount,
            price_impact_pct: quote.price_impact_pct,
            slot: None,
            prioritization_fee_lamports: unsigned.prioritization_fee_lamports(),
        };
        if !wait_for_confirmation {
            return Ok(result);
        }

        *stage = SwapStage::Confirming;
        let slot = self.confirm(&signature, signed.last_valid_block_height()).await?;
        result.confirmation_status = ConfirmationStatus::Confirmed;
        result.slot = Some(slot);
        Ok(result)
    }

    async fn quote(&self, request: &SwapRequest) -> Result<Quote> {
        info!(
            stage = %SwapStage::Quoting,
            input_mint = %request.input_mint,
            output_mint = %request.output_mint,
            amount = request.amount,
            slippage_bps = request.slippage_bps,
            "Requesting quote"
        );
        let quote = self.quotes.get_quote(request).await?;
        debug!(
            out_amount = quote.out_amount,
            min_out = quote.other_amount_threshold,
            price_impact_pct = quote.price_impact_pct,
            hops = quote.route.len(),
            "Quote received"
        );
        Ok(quote)
    }

    async fn build(&self, quote: &Quote, user: &Pubkey) -> Result<UnsignedTransaction> {
        let options = BuildOptions::from(&self.policy);
        info!(stage = %SwapStage::Building, wallet = %user, "Building swap transaction");
        let unsigned = self.builder.build_transaction(quote, user, &options).await?;
        unsigned.ensure_simulation_passed()?;
        debug!(
            last_valid_block_height = unsigned.last_valid_block_height(),
            priority_fee_lamports = unsigned.prioritization_fee_lamports(),
            compute_unit_limit = unsigned.compute_unit_limit(),
            "Swap transaction built"
        );
        Ok(unsigned)
    }

    async fn notify_signed(&self, signed: &SignedTransaction, quote: &Quote) {
        let Some(callback) = &self.on_transaction_signed else {
            return;
        };
        let context = CallbackContext::new(
            signed.transaction().clone(),
            quote.input_mint,
            quote.output_mint,
            quote.in_amount,
            quote.out_amount,
        );
        if let Err(e) = callback.on_transaction_signed(context).await {
            warn!(signature = %signed.signature(), error = %e, "on_transaction_signed callback failed");
        }
    }

    async fn submit(&self, signed: &SignedTransaction) -> Result<Signature> {
        let options = SubmitOptions {
            retry: self.policy.retry.clone(),
            preflight_commitment: self.commitment.commitment,
        };
        info!(stage = %SwapStage::Submitting, signature = %signed.signature(), "Submitting swap transaction");
        self.ledger.submit(signed, &options).await
    }

    async fn confirm(&self, signature: &Signature, last_valid_block_height: u64) -> Result<u64> {
        let options = ConfirmOptions {
            commitment: self.commitment,
            poll_interval: self.policy.confirm_poll_interval,
            last_valid_block_height: Some(last_valid_block_height),
        };
        let budget = self.policy.confirm_timeout;
        info!(
            stage = %SwapStage::Confirming,
            signature = %signature,
            timeout_ms = budget.as_millis() as u64,
            "Waiting for confirmation"
        );

        let outcome = tokio::time::timeout(budget, self.ledger.confirm(signature, &options))
            .await
            .map_err(|_| SwapError::ConfirmationTimeout {
                signature: *signature,
                elapsed_ms: budget.as_millis() as u64,
            })??;

        match outcome {
            ConfirmationOutcome::Confirmed { slot } => Ok(slot),
            ConfirmationOutcome::Failed { error, .. } => {
                Err(SwapError::TransactionFailed { signature: Some(*signature), error })
            },
            ConfirmationOutcome::Expired => Err(SwapError::TransactionFailed {
                signature: Some(*signature),
                error: serde_json::json!({
                    "reason": "blockhash expired before the transaction landed",
                    "lastValidBlockHeight": last_valid_block_height,
                }),
            }),
        }
    }
}
