//! Local key custody
//!
//! Holds the wallet keypair for the life of the process. The secret is decoded
//! once during `initialize` and is never logged or returned.

use crate::common::{Result, SolanaRpcClient, SwapError};
use crate::trading::common::{SignedTransaction, UnsignedTransaction, sign_unsigned};
use crate::trading::core::traits::TransactionSigner;
use once_cell::sync::OnceCell;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

struct CustodianState {
    keypair: Keypair,
    rpc: Arc<SolanaRpcClient>,
}

/// Signing key holder, shared read-only by concurrent swaps.
///
/// Either fully initialized (keypair and RPC handle) or empty.
#[derive(Default)]
pub struct KeyCustodian {
    state: OnceCell<CustodianState>,
}

impl KeyCustodian {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the wallet key.
    ///
    /// Returns `Ok(false)` when no secret is configured (quote-only mode).
    /// Calling again after a successful load changes nothing.
    pub fn initialize(&self, secret: Option<&str>, rpc: Arc<SolanaRpcClient>) -> Result<bool> {
        if self.state.get().is_some() {
            return Ok(true);
        }
        let Some(secret) = secret.map(str::trim).filter(|s| !s.is_empty()) else {
            debug!("No wallet key configured, running in quote-only mode");
            return Ok(false);
        };

        let keypair = decode_keypair(secret)?;
        let wallet = keypair.pubkey();
        if self.state.set(CustodianState { keypair, rpc }).is_err() {
            // Lost an initialization race; the first key stays.
            return Ok(true);
        }
        info!(wallet = %wallet, "Wallet key loaded");
        Ok(true)
    }

    pub fn is_ready(&self) -> bool {
        self.state.get().is_some()
    }

    pub fn public_identity(&self) -> Option<Pubkey> {
        self.state.get().map(|state| state.keypair.pubkey())
    }

    /// RPC handle captured at initialization
    pub fn rpc(&self) -> Option<Arc<SolanaRpcClient>> {
        self.state.get().map(|state| state.rpc.clone())
    }

    pub fn sign(&self, unsigned: &UnsignedTransaction) -> Result<SignedTransaction> {
        let state = self.state.get().ok_or(SwapError::WalletNotInitialized)?;
        sign_unsigned(unsigned, &state.keypair)
    }

    /// Drop the key and RPC handle
    pub fn teardown(&mut self) {
        if let Some(state) = self.state.take() {
            info!(wallet = %state.keypair.pubkey(), "Wallet key released");
        }
    }
}

impl TransactionSigner for KeyCustodian {
    fn is_ready(&self) -> bool {
        KeyCustodian::is_ready(self)
    }

    fn public_identity(&self) -> Option<Pubkey> {
        KeyCustodian::public_identity(self)
    }

    fn sign(&self, unsigned: &UnsignedTransaction) -> Result<SignedTransaction> {
        KeyCustodian::sign(self, unsigned)
    }
}

impl fmt::Debug for KeyCustodian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCustodian")
            .field("wallet", &self.public_identity())
            .field("keypair", &"<redacted>")
            .finish()
    }
}

/// Decode a wallet secret.
///
/// Accepts a base-58 64-byte keypair, a base-58 32-byte seed, or the JSON byte
/// array written by `solana-keygen`. Errors never echo the secret.
pub fn decode_keypair(secret: &str) -> Result<Keypair> {
    let secret = secret.trim();
    let bytes = if secret.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(secret)
            .map_err(|_| SwapError::Config("wallet key JSON array is malformed".to_string()))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|_| SwapError::Config("wallet key is not valid base-58".to_string()))?
    };

    match bytes.len() {
        64 => Keypair::try_from(bytes.as_slice()).map_err(|_| {
            SwapError::Config("wallet key bytes do not form a valid ed25519 keypair".to_string())
        }),
        32 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes);
            Ok(Keypair::new_from_array(seed))
        },
        len => Err(SwapError::Config(format!(
            "wallet key must be 64 bytes (keypair) or 32 bytes (seed), got {} bytes",
            len
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;

    fn rpc() -> Arc<SolanaRpcClient> {
        Arc::new(SolanaRpcClient::new("http://127.0.0.1:8899".to_string()))
    }

    #[test]
    fn empty_custodian_is_not_ready() {
        let custodian = KeyCustodian::new();
        assert!(!custodian.is_ready());
        assert!(custodian.public_identity().is_none());
        assert!(custodian.rpc().is_none());

        let err = custodian.sign(&UnsignedTransaction::new(vec![], 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WalletNotInitialized);
    }

    #[test]
    fn missing_secret_means_quote_only() {
        let custodian = KeyCustodian::new();
        assert!(!custodian.initialize(None, rpc()).unwrap());
        assert!(!custodian.initialize(Some("   "), rpc()).unwrap());
        assert!(!custodian.is_ready());
    }

    #[test]
    fn initializes_from_base58_keypair() {
        let keypair = Keypair::new();
        let custodian = KeyCustodian::new();
        assert!(custodian.initialize(Some(&keypair.to_base58_string()), rpc()).unwrap());
        assert_eq!(custodian.public_identity(), Some(keypair.pubkey()));
        assert!(custodian.rpc().is_some());
    }

    #[test]
    fn second_initialize_keeps_first_key() {
        let first = Keypair::new();
        let second = Keypair::new();
        let custodian = KeyCustodian::new();
        custodian.initialize(Some(&first.to_base58_string()), rpc()).unwrap();
        assert!(custodian.initialize(Some(&second.to_base58_string()), rpc()).unwrap());
        assert_eq!(custodian.public_identity(), Some(first.pubkey()));
    }

    #[test]
    fn malformed_secret_is_config_error() {
        let custodian = KeyCustodian::new();
        for bad in ["not base58 0OIl", "3yZe7d", "[1,2,3]", "[1,2,"] {
            let err = custodian.initialize(Some(bad), rpc()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config, "{bad}");
        }
        assert!(!custodian.is_ready());
    }

    #[test]
    fn seed_and_json_array_forms() {
        let keypair = Keypair::new();
        let seed = bs58::encode(&keypair.to_bytes()[..32]).into_string();
        assert_eq!(decode_keypair(&seed).unwrap().pubkey(), keypair.pubkey());

        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        assert_eq!(decode_keypair(&json).unwrap().pubkey(), keypair.pubkey());
    }

    #[test]
    fn debug_redacts_keypair() {
        let keypair = Keypair::new();
        let custodian = KeyCustodian::new();
        custodian.initialize(Some(&keypair.to_base58_string()), rpc()).unwrap();
        let rendered = format!("{:?}", custodian);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&keypair.to_base58_string()));
    }

    #[test]
    fn teardown_returns_to_uninitialized() {
        let keypair = Keypair::new();
        let mut custodian = KeyCustodian::new();
        custodian.initialize(Some(&keypair.to_base58_string()), rpc()).unwrap();
        custodian.teardown();
        assert!(!custodian.is_ready());
        assert!(custodian.public_identity().is_none());
    }
}
