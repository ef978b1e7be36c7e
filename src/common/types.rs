use crate::common::error::{Result, SwapError};
use crate::constants::swap::{
    DEFAULT_CONFIRM_POLL_INTERVAL_MS, DEFAULT_CONFIRM_TIMEOUT_SECS, DEFAULT_JUPITER_TIMEOUT_MS,
    DEFAULT_PRIORITY_FEE_MAX_LAMPORTS, DEFAULT_SLIPPAGE_BPS, JUPITER_API_BASE,
};
use crate::jupiter::priority_fee::{PriorityFeePolicy, PriorityLevel};
use solana_commitment_config::CommitmentConfig;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Solana cluster the swap client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    #[default]
    MainnetBeta,
    Devnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::MainnetBeta => "mainnet-beta",
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
        }
    }

    /// Public RPC endpoint for the cluster
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
            Network::Testnet => "https://api.testnet.solana.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = SwapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet-beta" | "mainnet" => Ok(Network::MainnetBeta),
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(SwapError::Config(format!("unknown network '{}'", other))),
        }
    }
}

/// Submission retry parameters, consumed by the ledger client only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Skip the node's preflight simulation (the builder already simulated)
    pub skip_preflight: bool,
    /// Rebroadcast count handed to the RPC node (`maxRetries`)
    pub max_retries: usize,
    /// Local attempts when the RPC transport itself fails
    pub transport_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            skip_preflight: true,
            max_retries: 2,
            transport_attempts: 3,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Swap defaults applied when the caller leaves a parameter unset
#[derive(Debug, Clone, PartialEq)]
pub struct SwapPolicy {
    pub default_slippage_bps: u16,
    pub restrict_intermediate_tokens: bool,
    pub priority_fee: PriorityFeePolicy,
    pub dynamic_compute_unit_limit: bool,
    pub wrap_and_unwrap_sol: bool,
    pub confirm_timeout: Duration,
    pub confirm_poll_interval: Duration,
    pub wait_for_confirmation: bool,
    pub retry: RetryPolicy,
}

impl Default for SwapPolicy {
    fn default() -> Self {
        Self {
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            restrict_intermediate_tokens: true,
            priority_fee: PriorityFeePolicy::Auto {
                max_lamports: DEFAULT_PRIORITY_FEE_MAX_LAMPORTS,
                level: PriorityLevel::VeryHigh,
            },
            dynamic_compute_unit_limit: true,
            wrap_and_unwrap_sol: true,
            confirm_timeout: Duration::from_secs(DEFAULT_CONFIRM_TIMEOUT_SECS),
            confirm_poll_interval: Duration::from_millis(DEFAULT_CONFIRM_POLL_INTERVAL_MS),
            wait_for_confirmation: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl SwapPolicy {
    pub fn with_default_slippage_bps(mut self, bps: u16) -> Self {
        self.default_slippage_bps = bps;
        self
    }

    pub fn with_priority_fee(mut self, priority_fee: PriorityFeePolicy) -> Self {
        self.priority_fee = priority_fee;
        self
    }

    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    pub fn with_confirm_poll_interval(mut self, interval: Duration) -> Self {
        self.confirm_poll_interval = interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Jupiter swap API endpoint settings
#[derive(Clone, PartialEq, Eq)]
pub struct JupiterConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_millis: u64,
}

impl Default for JupiterConfig {
    fn default() -> Self {
        Self {
            base_url: JUPITER_API_BASE.to_string(),
            api_key: None,
            timeout_millis: DEFAULT_JUPITER_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for JupiterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JupiterConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_millis", &self.timeout_millis)
            .finish()
    }
}

#[derive(Clone)]
pub struct SwapConfig {
    pub network: Network,
    pub rpc_url: String,
    pub commitment: CommitmentConfig,
    /// Base-58 wallet secret; `None` runs the client in quote-only mode
    pub secret_key: Option<String>,
    pub jupiter: JupiterConfig,
    pub policy: SwapPolicy,
}

impl SwapConfig {
    pub fn new(network: Network, rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self {
            network,
            rpc_url,
            commitment,
            secret_key: None,
            jupiter: JupiterConfig::default(),
            policy: SwapPolicy::default(),
        }
    }

    /// Config pointing at the cluster's public RPC endpoint
    pub fn for_network(network: Network) -> Self {
        Self::new(network, network.default_rpc_url().to_string(), CommitmentConfig::confirmed())
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_jupiter(mut self, jupiter: JupiterConfig) -> Self {
        self.jupiter = jupiter;
        self
    }

    pub fn with_policy(mut self, policy: SwapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    /// Read configuration from the process environment.
    ///
    /// | variable | meaning |
    /// |---|---|
    /// | `SOLANA_NETWORK` | `mainnet-beta` (default), `devnet`, `testnet` |
    /// | `SOLANA_RPC_URL` | RPC endpoint, defaults to the network's public one |
    /// | `SOLANA_PRIVATE_KEY` | optional base-58 secret |
    /// | `JUPITER_API_URL` | swap API base URL |
    /// | `JUPITER_API_KEY` | optional API key |
    pub fn from_env() -> Result<Self> {
        let network = match non_empty_env("SOLANA_NETWORK") {
            Some(value) => value.parse::<Network>()?,
            None => Network::default(),
        };
        let rpc_url =
            non_empty_env("SOLANA_RPC_URL").unwrap_or_else(|| network.default_rpc_url().to_string());

        let mut jupiter = JupiterConfig::default();
        if let Some(base_url) = non_empty_env("JUPITER_API_URL") {
            jupiter.base_url = base_url;
        }
        jupiter.api_key = non_empty_env("JUPITER_API_KEY");

        let secret_key = non_empty_env("SOLANA_PRIVATE_KEY");

        debug!(
            network = %network,
            rpc_url = %rpc_url,
            jupiter_url = %jupiter.base_url,
            has_wallet = secret_key.is_some(),
            "Loaded swap config from environment"
        );

        Ok(Self {
            network,
            rpc_url,
            commitment: CommitmentConfig::confirmed(),
            secret_key,
            jupiter,
            policy: SwapPolicy::default(),
        })
    }
}

impl fmt::Debug for SwapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapConfig")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("commitment", &self.commitment)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("jupiter", &self.jupiter)
            .field("policy", &self.policy)
            .finish()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub type SolanaRpcClient = solana_client::nonblocking::rpc_client::RpcClient;
