use crate::common::{Result, SwapError};
use crate::constants::swap::MAX_SLIPPAGE_BPS;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Parse a base-58 mint address
pub fn parse_mint(value: &str) -> Result<Pubkey> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SwapError::InvalidAddress {
            value: value.to_string(),
            reason: "address is empty".to_string(),
        });
    }
    Pubkey::from_str(trimmed).map_err(|e| SwapError::InvalidAddress {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an amount in the token's smallest unit.
///
/// Only plain decimal digits are accepted, so `"1.5"`, `"-1"`, `"+1"` and
/// `"1e9"` are all rejected. Zero is a valid non-negative integer and is left
/// for the quote service to price or refuse.
pub fn parse_amount(value: &str) -> Result<u64> {
    let invalid = |reason: &str| SwapError::InvalidAmount {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("amount is empty"));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("amount must be a non-negative integer in the token's smallest unit"));
    }
    trimmed.parse::<u64>().map_err(|_| invalid("amount does not fit in 64 bits"))
}

pub fn validate_slippage(bps: u16) -> Result<u16> {
    if bps > MAX_SLIPPAGE_BPS {
        return Err(SwapError::InvalidSlippage { bps });
    }
    Ok(bps)
}
