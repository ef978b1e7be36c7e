use crate::common::{Result, RetryPolicy, SwapError, SwapPolicy};
use crate::jupiter::priority_fee::PriorityFeePolicy;
use crate::trading::common::{parse_amount, parse_mint, validate_slippage};
use solana_commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;

/// Raw swap parameters as received from the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapParams {
    pub input_mint: String,
    pub output_mint: String,
    /// Integer amount in the input token's smallest unit
    pub amount: String,
    pub slippage_bps: Option<u16>,
    pub only_direct_routes: Option<bool>,
    pub restrict_intermediate_tokens: Option<bool>,
    pub wait_for_confirmation: Option<bool>,
}

impl SwapParams {
    pub fn new(
        input_mint: impl Into<String>,
        output_mint: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            input_mint: input_mint.into(),
            output_mint: output_mint.into(),
            amount: amount.into(),
            ..Default::default()
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u16) -> Self {
        self.slippage_bps = Some(slippage_bps);
        self
    }

    pub fn with_only_direct_routes(mut self, only_direct_routes: bool) -> Self {
        self.only_direct_routes = Some(only_direct_routes);
        self
    }

    pub fn with_restrict_intermediate_tokens(mut self, restrict: bool) -> Self {
        self.restrict_intermediate_tokens = Some(restrict);
        self
    }

    pub fn with_wait_for_confirmation(mut self, wait: bool) -> Self {
        self.wait_for_confirmation = Some(wait);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRestriction {
    pub only_direct_routes: bool,
    pub restrict_intermediate_tokens: bool,
}

/// Validated swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount: u64,
    pub slippage_bps: u16,
    pub route: RouteRestriction,
}

impl SwapRequest {
    /// Validate raw parameters, filling unset ones from the policy. Purely local.
    pub fn from_params(params: &SwapParams, policy: &SwapPolicy) -> Result<Self> {
        let input_mint = parse_mint(&params.input_mint)?;
        let output_mint = parse_mint(&params.output_mint)?;
        if input_mint == output_mint {
            return Err(SwapError::InvalidAddress {
                value: params.output_mint.clone(),
                reason: "input and output mints must differ".to_string(),
            });
        }
        let amount = parse_amount(&params.amount)?;
        let slippage_bps =
            validate_slippage(params.slippage_bps.unwrap_or(policy.default_slippage_bps))?;

        Ok(Self {
            input_mint,
            output_mint,
            amount,
            slippage_bps,
            route: RouteRestriction {
                only_direct_routes: params.only_direct_routes.unwrap_or(false),
                restrict_intermediate_tokens: params
                    .restrict_intermediate_tokens
                    .unwrap_or(policy.restrict_intermediate_tokens),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub priority_fee: PriorityFeePolicy,
    pub dynamic_compute_unit_limit: bool,
    pub wrap_and_unwrap_sol: bool,
}

impl From<&SwapPolicy> for BuildOptions {
    fn from(policy: &SwapPolicy) -> Self {
        Self {
            priority_fee: policy.priority_fee,
            dynamic_compute_unit_limit: policy.dynamic_compute_unit_limit,
            wrap_and_unwrap_sol: policy.wrap_and_unwrap_sol,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOptions {
    pub retry: RetryPolicy,
    pub preflight_commitment: CommitmentLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub commitment: CommitmentConfig,
    pub poll_interval: Duration,
    /// Report `Expired` once the chain passes this height with no status
    pub last_valid_block_height: Option<u64>,
}
