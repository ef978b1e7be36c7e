//! Shared test helpers
//!
//! Spy doubles for the pipeline seams plus fixtures for quotes and swap
//! transactions. Every double counts its calls so tests can assert which
//! stages ran.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use sol_swap_executor::common::{Result, RetryPolicy, SwapError, SwapPolicy};
use sol_swap_executor::jupiter::types::QuoteResponse;
use sol_swap_executor::trading::{
    BuildOptions, ConfirmOptions, ConfirmationOutcome, LedgerClient, Quote, QuoteProvider,
    SignedTransaction, SubmitOptions, SwapOrchestrator, SwapRequest, TransactionBuilder,
    TransactionSigner, UnsignedTransaction,
};
use sol_swap_executor::wallet::KeyCustodian;
use sol_swap_executor::common::SolanaRpcClient;
use solana_sdk::hash::Hash;
use solana_sdk::message::{VersionedMessage, v0};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::VersionedTransaction;
use solana_system_interface::instruction::transfer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SOL: &str = "So11111111111111111111111111111111111111112";
pub const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

pub const LAST_VALID_BLOCK_HEIGHT: u64 = 290_000_150;

/// Quote response body as served by `/quote`
pub fn quote_json(input_mint: &str, output_mint: &str, in_amount: u64, out_amount: u64) -> Value {
    json!({
        "inputMint": input_mint,
        "inAmount": in_amount.to_string(),
        "outputMint": output_mint,
        "outAmount": out_amount.to_string(),
        "otherAmountThreshold": (out_amount - out_amount / 200).to_string(),
        "swapMode": "ExactIn",
        "slippageBps": 50,
        "platformFee": null,
        "priceImpactPct": "0.0001",
        "routePlan": [{
            "swapInfo": {
                "ammKey": "HcoJqG325TTifs6jyWvRJ9ET4pDu12Xrt2EQKZGFmuKX",
                "label": "Whirlpool",
                "inputMint": input_mint,
                "outputMint": output_mint,
                "inAmount": in_amount.to_string(),
                "outAmount": out_amount.to_string(),
                "feeAmount": "20",
                "feeMint": input_mint
            },
            "percent": 100
        }],
        "contextSlot": 312345678,
        "timeTaken": 0.004
    })
}

pub fn quote_for(request: &SwapRequest, out_amount: u64) -> Quote {
    let raw: QuoteResponse = serde_json::from_value(quote_json(
        &request.input_mint.to_string(),
        &request.output_mint.to_string(),
        request.amount,
        out_amount,
    ))
    .unwrap();
    Quote::from_response(raw).unwrap()
}

/// Unsigned v0 transaction paying from `payer`, signatures zeroed as the
/// swap API returns them
pub fn swap_transaction(payer: &Pubkey) -> VersionedTransaction {
    let ix = transfer(payer, &Pubkey::new_unique(), 5_000);
    let message = v0::Message::try_compile(payer, &[ix], &[], Hash::new_unique()).unwrap();
    VersionedTransaction {
        signatures: vec![Signature::default(); 1],
        message: VersionedMessage::V0(message),
    }
}

pub fn unsigned_for(payer: &Pubkey) -> UnsignedTransaction {
    UnsignedTransaction::new(bincode::serialize(&swap_transaction(payer)).unwrap(), LAST_VALID_BLOCK_HEIGHT)
        .with_fee_estimate(12_345, 200_000)
}

pub fn swap_transaction_base64(payer: &Pubkey) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .encode(bincode::serialize(&swap_transaction(payer)).unwrap())
}

pub fn local_rpc() -> Arc<SolanaRpcClient> {
    Arc::new(SolanaRpcClient::new("http://127.0.0.1:1".to_string()))
}

pub fn ready_custodian() -> (Arc<KeyCustodian>, Keypair) {
    let keypair = Keypair::new();
    let custodian = KeyCustodian::new();
    custodian.initialize(Some(&keypair.to_base58_string()), local_rpc()).unwrap();
    (Arc::new(custodian), keypair)
}

// ============================================================================
// Spy doubles
// ============================================================================

#[derive(Default)]
pub struct SpyQuoteProvider {
    pub calls: AtomicUsize,
    pub unavailable: bool,
}

#[async_trait]
impl QuoteProvider for SpyQuoteProvider {
    async fn get_quote(&self, request: &SwapRequest) -> Result<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(SwapError::QuoteUnavailable("no route".to_string()));
        }
        Ok(quote_for(request, 187_654_321))
    }
}

#[derive(Default)]
pub struct SpyBuilder {
    pub calls: AtomicUsize,
    pub simulation_error: Option<Value>,
    pub last_user: Mutex<Option<Pubkey>>,
}

#[async_trait]
impl TransactionBuilder for SpyBuilder {
    async fn build_transaction(
        &self,
        _quote: &Quote,
        user_public_key: &Pubkey,
        _options: &BuildOptions,
    ) -> Result<UnsignedTransaction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_user.lock().unwrap() = Some(*user_public_key);
        Ok(unsigned_for(user_public_key).with_simulation_error(self.simulation_error.clone()))
    }
}

/// Delegates to a real custodian and counts signing calls
pub struct SpySigner {
    pub inner: Arc<KeyCustodian>,
    pub calls: AtomicUsize,
}

impl SpySigner {
    pub fn new(inner: Arc<KeyCustodian>) -> Self {
        Self { inner, calls: AtomicUsize::new(0) }
    }
}

impl TransactionSigner for SpySigner {
    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn public_identity(&self) -> Option<Pubkey> {
        self.inner.public_identity()
    }

    fn sign(&self, unsigned: &UnsignedTransaction) -> Result<SignedTransaction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sign(unsigned)
    }
}

#[derive(Debug, Clone)]
pub enum SubmitBehavior {
    Accept,
    Transport,
    Rejected(Value),
}

#[derive(Debug, Clone)]
pub enum ConfirmBehavior {
    Confirmed(u64),
    Failed(Value),
    Expired,
    /// Never settles
    Hang,
}

pub struct SpyLedger {
    pub submits: AtomicUsize,
    pub confirms: AtomicUsize,
    pub submit: SubmitBehavior,
    pub confirm: ConfirmBehavior,
    pub submitted: Mutex<Vec<Signature>>,
    pub last_submit_options: Mutex<Option<SubmitOptions>>,
    pub last_confirm_options: Mutex<Option<ConfirmOptions>>,
}

impl SpyLedger {
    pub fn new(submit: SubmitBehavior, confirm: ConfirmBehavior) -> Self {
        Self {
            submits: AtomicUsize::new(0),
            confirms: AtomicUsize::new(0),
            submit,
            confirm,
            submitted: Mutex::new(Vec::new()),
            last_submit_options: Mutex::new(None),
            last_confirm_options: Mutex::new(None),
        }
    }
}

#[async_trait]
impl LedgerClient for SpyLedger {
    async fn submit(&self, transaction: &SignedTransaction, options: &SubmitOptions) -> Result<Signature> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        *self.last_submit_options.lock().unwrap() = Some(options.clone());
        match &self.submit {
            SubmitBehavior::Accept => {
                self.submitted.lock().unwrap().push(transaction.signature());
                Ok(transaction.signature())
            },
            SubmitBehavior::Transport => Err(SwapError::TransportError {
                attempts: options.retry.transport_attempts,
                message: "connection refused".to_string(),
            }),
            SubmitBehavior::Rejected(error) => Err(SwapError::TransactionFailed {
                signature: Some(transaction.signature()),
                error: error.clone(),
            }),
        }
    }

    async fn confirm(&self, _signature: &Signature, options: &ConfirmOptions) -> Result<ConfirmationOutcome> {
        self.confirms.fetch_add(1, Ordering::SeqCst);
        *self.last_confirm_options.lock().unwrap() = Some(*options);
        match &self.confirm {
            ConfirmBehavior::Confirmed(slot) => Ok(ConfirmationOutcome::Confirmed { slot: *slot }),
            ConfirmBehavior::Failed(error) => {
                Ok(ConfirmationOutcome::Failed { slot: 1, error: error.clone() })
            },
            ConfirmBehavior::Expired => Ok(ConfirmationOutcome::Expired),
            ConfirmBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ConfirmationOutcome::Expired)
            },
        }
    }
}

/// Orchestrator wired to spies
pub struct Harness {
    pub quotes: Arc<SpyQuoteProvider>,
    pub builder: Arc<SpyBuilder>,
    pub signer: Arc<SpySigner>,
    pub ledger: Arc<SpyLedger>,
    pub orchestrator: SwapOrchestrator,
}

impl Harness {
    pub fn new(
        custodian: Arc<KeyCustodian>,
        quotes: SpyQuoteProvider,
        builder: SpyBuilder,
        ledger: SpyLedger,
    ) -> Self {
        Self::with_policy(custodian, quotes, builder, ledger, fast_policy())
    }

    pub fn with_policy(
        custodian: Arc<KeyCustodian>,
        quotes: SpyQuoteProvider,
        builder: SpyBuilder,
        ledger: SpyLedger,
        policy: SwapPolicy,
    ) -> Self {
        let quotes = Arc::new(quotes);
        let builder = Arc::new(builder);
        let signer = Arc::new(SpySigner::new(custodian));
        let ledger = Arc::new(ledger);
        let orchestrator = SwapOrchestrator::new(
            quotes.clone(),
            builder.clone(),
            signer.clone(),
            ledger.clone(),
            policy,
        );
        Self { quotes, builder, signer, ledger, orchestrator }
    }

    pub fn ready(ledger: SpyLedger) -> Self {
        let (custodian, _) = ready_custodian();
        Self::new(custodian, SpyQuoteProvider::default(), SpyBuilder::default(), ledger)
    }

    pub fn quote_calls(&self) -> usize {
        self.quotes.calls.load(Ordering::SeqCst)
    }

    pub fn build_calls(&self) -> usize {
        self.builder.calls.load(Ordering::SeqCst)
    }

    pub fn sign_calls(&self) -> usize {
        self.signer.calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.ledger.submits.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> usize {
        self.ledger.confirms.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.quote_calls() + self.build_calls() + self.submit_calls() + self.confirm_calls()
    }
}

/// Default policy with a short confirmation budget
pub fn fast_policy() -> SwapPolicy {
    SwapPolicy::default()
        .with_confirm_timeout(Duration::from_millis(200))
        .with_confirm_poll_interval(Duration::from_millis(10))
        .with_retry(RetryPolicy { backoff: Duration::from_millis(1), ..RetryPolicy::default() })
}
