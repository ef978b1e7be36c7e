//! Jupiter swap API v1 wire types
//!
//! Only the fields the pipeline reads are typed. Everything else is kept in
//! `extra` so a quote can be posted back to `/swap` unchanged.

use crate::jupiter::priority_fee::PriorityFeePolicy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /quote` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub input_mint: String,
    pub in_amount: String,
    pub output_mint: String,
    pub out_amount: String,
    pub other_amount_threshold: String,
    pub swap_mode: String,
    pub slippage_bps: u16,
    pub price_impact_pct: String,
    pub route_plan: Vec<RoutePlanStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_slot: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanStep {
    pub swap_info: SwapInfo,
    pub percent: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub amm_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `POST /swap` body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestBody<'a> {
    pub user_public_key: String,
    pub quote_response: &'a QuoteResponse,
    pub dynamic_compute_unit_limit: bool,
    pub wrap_and_unwrap_sol: bool,
    pub prioritization_fee_lamports: PriorityFeePolicy,
}

/// `POST /swap` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    /// Base64 bincode `VersionedTransaction`, signatures zeroed
    pub swap_transaction: String,
    pub last_valid_block_height: u64,
    #[serde(default)]
    pub prioritization_fee_lamports: u64,
    #[serde(default)]
    pub compute_unit_limit: u32,
    #[serde(default)]
    pub simulation_error: Option<Value>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub error: Option<String>,
    pub error_code: Option<String>,
}

/// Human-readable message out of an error response body
pub fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { error: Some(error), error_code: Some(code) }) => {
            format!("{} ({})", error, code)
        },
        Ok(ApiErrorBody { error: Some(error), .. }) => error,
        _ => {
            let trimmed = body.trim();
            if trimmed.chars().count() > 256 {
                format!("{}...", trimmed.chars().take(256).collect::<String>())
            } else {
                trimmed.to_string()
            }
        },
    }
}
