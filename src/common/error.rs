//! Swap error taxonomy
//!
//! Every failure of the swap pipeline is one of these kinds. None of them is
//! fatal to the process; each is an expected outcome of talking to a remote
//! quoting service and a public ledger.

use serde::Serialize;
use serde_json::Value;
use solana_sdk::signature::Signature;
use std::fmt::{self, Display, Formatter};

/// Machine-readable error classification handed to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidAddress,
    InvalidAmount,
    InvalidSlippage,
    QuoteUnavailable,
    BuildFailed,
    SimulationFailed,
    NoSignerAvailable,
    WalletNotInitialized,
    SigningFailed,
    TransportError,
    TransactionFailed,
    ConfirmationTimeout,
    Config,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidAddress => "InvalidAddress",
            ErrorKind::InvalidAmount => "InvalidAmount",
            ErrorKind::InvalidSlippage => "InvalidSlippage",
            ErrorKind::QuoteUnavailable => "QuoteUnavailable",
            ErrorKind::BuildFailed => "BuildFailed",
            ErrorKind::SimulationFailed => "SimulationFailed",
            ErrorKind::NoSignerAvailable => "NoSignerAvailable",
            ErrorKind::WalletNotInitialized => "WalletNotInitialized",
            ErrorKind::SigningFailed => "SigningFailed",
            ErrorKind::TransportError => "TransportError",
            ErrorKind::TransactionFailed => "TransactionFailed",
            ErrorKind::ConfirmationTimeout => "ConfirmationTimeout",
            ErrorKind::Config => "Config",
        };
        f.write_str(name)
    }
}

/// Swap pipeline error
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("invalid token address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("invalid slippage {bps} bps: must be between 0 and 10000")]
    InvalidSlippage { bps: u16 },

    #[error("quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("swap transaction could not be built: {0}")]
    BuildFailed(String),

    #[error("swap simulation failed: {message}")]
    SimulationFailed { message: String, details: Option<Value> },

    #[error("no signer available: configure a wallet key or pass a user public key")]
    NoSignerAvailable,

    #[error("wallet not initialized: a private key is required to execute swaps")]
    WalletNotInitialized,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("transaction submission failed after {attempts} attempt(s): {message}")]
    TransportError { attempts: u32, message: String },

    #[error("transaction failed on chain: {error}")]
    TransactionFailed { signature: Option<Signature>, error: Value },

    #[error(
        "confirmation of {signature} timed out after {elapsed_ms} ms; the transaction may still land"
    )]
    ConfirmationTimeout { signature: Signature, elapsed_ms: u64 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl SwapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            SwapError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            SwapError::InvalidSlippage { .. } => ErrorKind::InvalidSlippage,
            SwapError::QuoteUnavailable(_) => ErrorKind::QuoteUnavailable,
            SwapError::BuildFailed(_) => ErrorKind::BuildFailed,
            SwapError::SimulationFailed { .. } => ErrorKind::SimulationFailed,
            SwapError::NoSignerAvailable => ErrorKind::NoSignerAvailable,
            SwapError::WalletNotInitialized => ErrorKind::WalletNotInitialized,
            SwapError::SigningFailed(_) => ErrorKind::SigningFailed,
            SwapError::TransportError { .. } => ErrorKind::TransportError,
            SwapError::TransactionFailed { .. } => ErrorKind::TransactionFailed,
            SwapError::ConfirmationTimeout { .. } => ErrorKind::ConfirmationTimeout,
            SwapError::Config(_) => ErrorKind::Config,
        }
    }

    /// Signature of the transaction this error refers to, once one was submitted.
    pub fn signature(&self) -> Option<Signature> {
        match self {
            SwapError::TransactionFailed { signature, .. } => *signature,
            SwapError::ConfirmationTimeout { signature, .. } => Some(*signature),
            _ => None,
        }
    }

    /// True when the outcome on chain is unknown and the caller must re-check the
    /// signature before trying again.
    pub fn is_possibly_landed(&self) -> bool {
        matches!(self, SwapError::ConfirmationTimeout { .. })
    }

    /// Structured, serializable form for the handler layer.
    pub fn to_failure(&self) -> SwapFailure {
        let details = match self {
            SwapError::SimulationFailed { details, .. } => details.clone(),
            SwapError::TransactionFailed { error, .. } => Some(error.clone()),
            _ => None,
        };
        SwapFailure {
            kind: self.kind(),
            message: self.to_string(),
            signature: self.signature().map(|sig| sig.to_string()),
            possibly_landed: self.is_possibly_landed(),
            details,
        }
    }
}

/// Failure report rendered by callers of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SwapFailure {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub possibly_landed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub type Result<T> = std::result::Result<T, SwapError>;
