pub mod common;
pub mod constants;
pub mod jupiter;
pub mod ledger;
pub mod trading;
pub mod wallet;

use crate::common::{Result, SolanaRpcClient, SwapConfig};
use crate::jupiter::JupiterClient;
use crate::ledger::RpcLedgerClient;
use crate::wallet::KeyCustodian;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{info, warn};

pub use crate::common::{ErrorKind, Network, SwapError, SwapFailure, SwapPolicy};
pub use crate::jupiter::{PriorityFeePolicy, PriorityLevel};
pub use crate::trading::{
    CallbackContext, CallbackRef, ConfirmationStatus, NoopCallback, PreparedSwap, Quote,
    SwapOrchestrator, SwapParams, SwapResult, TransactionLifecycleCallback,
};

/// Swap client for Solana token swaps routed through Jupiter
///
/// Wires the Jupiter API client, the RPC ledger client and the local key
/// custodian into one orchestrator. Without a configured wallet key the client
/// runs in quote-only mode: `get_quote` and `prepare_swap` work, `execute_swap`
/// returns `WalletNotInitialized`.
pub struct SwapClient {
    /// RPC client shared by the ledger client and the custodian
    pub rpc: Arc<SolanaRpcClient>,
    custodian: Arc<KeyCustodian>,
    orchestrator: SwapOrchestrator,
    config: SwapConfig,
}

impl SwapClient {
    pub fn new(config: SwapConfig) -> Result<Self> {
        let rpc = Arc::new(SolanaRpcClient::new_with_commitment(
            config.rpc_url.clone(),
            config.commitment,
        ));

        let custodian = Arc::new(KeyCustodian::new());
        custodian.initialize(config.secret_key.as_deref(), rpc.clone())?;

        let jupiter = Arc::new(JupiterClient::new(&config.jupiter)?);
        let ledger = Arc::new(RpcLedgerClient::new(rpc.clone()));
        let orchestrator = SwapOrchestrator::new(
            jupiter.clone(),
            jupiter,
            custodian.clone(),
            ledger,
            config.policy.clone(),
        )
        .with_commitment(config.commitment);

        info!(
            network = %config.network,
            rpc_url = %config.rpc_url,
            wallet = ?custodian.public_identity(),
            "Swap client ready"
        );

        Ok(Self { rpc, custodian, orchestrator, config })
    }

    /// Build from `SOLANA_*` / `JUPITER_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(SwapConfig::from_env()?)
    }

    /// Invoke `callback` after every signing, before submission
    pub fn with_callback(mut self, callback: CallbackRef) -> Self {
        self.orchestrator = self.orchestrator.with_callback(callback);
        self
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    pub fn public_key(&self) -> Option<Pubkey> {
        self.custodian.public_identity()
    }

    pub fn can_execute(&self) -> bool {
        self.orchestrator.can_execute()
    }

    pub async fn get_quote(&self, params: &SwapParams) -> Result<Quote> {
        self.orchestrator.get_quote(params).await
    }

    pub async fn execute_swap(&self, params: &SwapParams) -> Result<SwapResult> {
        self.orchestrator.execute_swap(params).await
    }

    pub async fn prepare_swap(
        &self,
        params: &SwapParams,
        user_public_key: Option<&str>,
    ) -> Result<PreparedSwap> {
        self.orchestrator.prepare_swap(params, user_public_key).await
    }

    /// Release the wallet key
    pub fn shutdown(self) {
        let Self { custodian, orchestrator, .. } = self;
        drop(orchestrator);
        let mut custodian = custodian;
        match Arc::get_mut(&mut custodian) {
            Some(custodian) => custodian.teardown(),
            None => warn!("Key custodian still shared, key is released with the last handle"),
        }
    }
}
