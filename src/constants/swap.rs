/// Jupiter swap API v1 (lite tier, no key required)
pub const JUPITER_API_BASE: &str = "https://lite-api.jup.ag/swap/v1";

/// Header carrying the optional Jupiter API key
pub const JUPITER_API_KEY_HEADER: &str = "x-api-key";

pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;
pub const MAX_SLIPPAGE_BPS: u16 = 10_000;

pub const DEFAULT_PRIORITY_FEE_MAX_LAMPORTS: u64 = 1_000_000;

pub const DEFAULT_JUPITER_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONFIRM_POLL_INTERVAL_MS: u64 = 500;
