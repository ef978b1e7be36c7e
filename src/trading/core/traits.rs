use crate::common::Result;
use crate::trading::common::{SignedTransaction, UnsignedTransaction};
use crate::trading::core::params::{BuildOptions, ConfirmOptions, SubmitOptions, SwapRequest};
use crate::trading::core::types::{ConfirmationOutcome, Quote};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

/// Prices a swap route
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn get_quote(&self, request: &SwapRequest) -> Result<Quote>;
}

/// Turns a quote into an unsigned transaction for a given fee payer
#[async_trait]
pub trait TransactionBuilder: Send + Sync {
    async fn build_transaction(
        &self,
        quote: &Quote,
        user_public_key: &Pubkey,
        options: &BuildOptions,
    ) -> Result<UnsignedTransaction>;
}

/// Local signing key holder. Signing never touches the network.
pub trait TransactionSigner: Send + Sync {
    fn is_ready(&self) -> bool;

    fn public_identity(&self) -> Option<Pubkey>;

    fn sign(&self, unsigned: &UnsignedTransaction) -> Result<SignedTransaction>;
}

/// Submission and confirmation against the ledger
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn submit(&self, transaction: &SignedTransaction, options: &SubmitOptions)
    -> Result<Signature>;

    /// Poll until the commitment is reached, an execution error is reported, or
    /// the blockhash expires. Runs until one of those happens; callers bound it.
    async fn confirm(
        &self,
        signature: &Signature,
        options: &ConfirmOptions,
    ) -> Result<ConfirmationOutcome>;
}
