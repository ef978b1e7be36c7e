use crate::jupiter::types::QuoteResponse;
use crate::trading::common::UnsignedTransaction;
use anyhow::{Context, Result};
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::fmt;
use std::str::FromStr;

/// One leg of a quoted route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteHop {
    pub amm_key: Pubkey,
    pub label: Option<String>,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub in_amount: u64,
    pub out_amount: u64,
    pub percent: u8,
}

/// Priced route, parsed once from the quote response.
///
/// The response itself is kept and handed back to the builder untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub in_amount: u64,
    pub out_amount: u64,
    /// Minimum output after slippage
    pub other_amount_threshold: u64,
    pub slippage_bps: u16,
    pub price_impact_pct: f64,
    pub route: Vec<RouteHop>,
    pub context_slot: Option<u64>,
    raw: QuoteResponse,
}

impl Quote {
    pub fn from_response(raw: QuoteResponse) -> Result<Self> {
        let route = raw
            .route_plan
            .iter()
            .map(|step| -> Result<RouteHop> {
                let info = &step.swap_info;
                Ok(RouteHop {
                    amm_key: parse_pubkey(&info.amm_key, "ammKey")?,
                    label: info.label.clone(),
                    input_mint: parse_pubkey(&info.input_mint, "swapInfo.inputMint")?,
                    output_mint: parse_pubkey(&info.output_mint, "swapInfo.outputMint")?,
                    in_amount: parse_u64(&info.in_amount, "swapInfo.inAmount")?,
                    out_amount: parse_u64(&info.out_amount, "swapInfo.outAmount")?,
                    percent: step.percent.unwrap_or(100),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let price_impact_pct = raw
            .price_impact_pct
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid priceImpactPct '{}'", raw.price_impact_pct))?;

        Ok(Self {
            input_mint: parse_pubkey(&raw.input_mint, "inputMint")?,
            output_mint: parse_pubkey(&raw.output_mint, "outputMint")?,
            in_amount: parse_u64(&raw.in_amount, "inAmount")?,
            out_amount: parse_u64(&raw.out_amount, "outAmount")?,
            other_amount_threshold: parse_u64(&raw.other_amount_threshold, "otherAmountThreshold")?,
            slippage_bps: raw.slippage_bps,
            price_impact_pct,
            route,
            context_slot: raw.context_slot,
            raw,
        })
    }

    /// The quote response exactly as the service returned it
    pub fn raw_response(&self) -> &QuoteResponse {
        &self.raw
    }

    pub fn route_labels(&self) -> Vec<&str> {
        self.route.iter().filter_map(|hop| hop.label.as_deref()).collect()
    }
}

fn parse_pubkey(value: &str, field: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).with_context(|| format!("Invalid {} '{}'", field, value))
}

fn parse_u64(value: &str, field: &str) -> Result<u64> {
    value.parse::<u64>().with_context(|| format!("Invalid {} '{}'", field, value))
}

/// Quote plus the unsigned transaction built for it, for signing elsewhere
#[derive(Debug, Clone)]
pub struct PreparedSwap {
    pub quote: Quote,
    pub transaction: UnsignedTransaction,
    pub user_public_key: Pubkey,
}

/// Result of polling a submitted signature
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationOutcome {
    Confirmed { slot: u64 },
    /// The network executed the transaction and reported an error
    Failed { slot: u64, error: Value },
    /// Block height passed the blockhash validity window with no status
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Failed,
}

impl ConfirmationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationStatus::Pending => "pending",
            ConfirmationStatus::Confirmed => "confirmed",
            ConfirmationStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapResult {
    pub signature: Signature,
    pub confirmation_status: ConfirmationStatus,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub in_amount: u64,
    pub out_amount: u64,
    pub price_impact_pct: f64,
    pub slot: Option<u64>,
    pub prioritization_fee_lamports: u64,
}

impl SwapResult {
    /// JSON form for the handler layer
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "signature": self.signature.to_string(),
            "confirmation_status": self.confirmation_status.as_str(),
            "input_mint": self.input_mint.to_string(),
            "output_mint": self.output_mint.to_string(),
            "in_amount": self.in_amount.to_string(),
            "out_amount": self.out_amount.to_string(),
            "price_impact_pct": self.price_impact_pct,
            "slot": self.slot,
            "prioritization_fee_lamports": self.prioritization_fee_lamports,
        })
    }
}

/// Pipeline stage of one swap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    Validating,
    Quoting,
    Building,
    Signing,
    Submitting,
    Confirming,
    Succeeded,
    Failed,
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapStage::Validating => "validating",
            SwapStage::Quoting => "quoting",
            SwapStage::Building => "building",
            SwapStage::Signing => "signing",
            SwapStage::Submitting => "submitting",
            SwapStage::Confirming => "confirming",
            SwapStage::Succeeded => "succeeded",
            SwapStage::Failed => "failed",
        };
        f.write_str(name)
    }
}
