use crate::common::{JupiterConfig, Result, SwapError};
use crate::constants::swap::JUPITER_API_KEY_HEADER;
use crate::jupiter::types::{QuoteResponse, SwapRequestBody, SwapResponse, api_error_message};
use crate::trading::common::UnsignedTransaction;
use crate::trading::core::params::{BuildOptions, SwapRequest};
use crate::trading::core::traits::{QuoteProvider, TransactionBuilder};
use crate::trading::core::types::Quote;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Jupiter swap API client: `/quote` pricing and `/swap` transaction building
#[derive(Clone)]
pub struct JupiterClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl fmt::Debug for JupiterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JupiterClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl JupiterClient {
    pub fn new(config: &JupiterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_millis))
            .build()
            .map_err(|e| SwapError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(JUPITER_API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Raw `/quote` call
    pub async fn fetch_quote(&self, request: &SwapRequest) -> Result<QuoteResponse> {
        let start = Instant::now();
        let query = [
            ("inputMint", request.input_mint.to_string()),
            ("outputMint", request.output_mint.to_string()),
            ("amount", request.amount.to_string()),
            ("slippageBps", request.slippage_bps.to_string()),
            ("onlyDirectRoutes", request.route.only_direct_routes.to_string()),
            ("restrictIntermediateTokens", request.route.restrict_intermediate_tokens.to_string()),
            ("swapMode", "ExactIn".to_string()),
        ];

        let response = self
            .with_api_key(self.client.get(format!("{}/quote", self.base_url)).query(&query))
            .send()
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("quote request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("failed to read quote response: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "Quote API returned an error");
            return Err(SwapError::QuoteUnavailable(format!(
                "quote API returned {}: {}",
                status,
                api_error_message(&body)
            )));
        }

        let quote: QuoteResponse = serde_json::from_str(&body)
            .map_err(|e| SwapError::QuoteUnavailable(format!("malformed quote response: {}", e)))?;
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Quote API responded");
        Ok(quote)
    }

    /// Raw `/swap` call
    pub async fn fetch_swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &Pubkey,
        options: &BuildOptions,
    ) -> Result<SwapResponse> {
        let start = Instant::now();
        let body = SwapRequestBody {
            user_public_key: user_public_key.to_string(),
            quote_response: quote.raw_response(),
            dynamic_compute_unit_limit: options.dynamic_compute_unit_limit,
            wrap_and_unwrap_sol: options.wrap_and_unwrap_sol,
            prioritization_fee_lamports: options.priority_fee,
        };

        let response = self
            .with_api_key(self.client.post(format!("{}/swap", self.base_url)).json(&body))
            .send()
            .await
            .map_err(|e| SwapError::BuildFailed(format!("swap request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SwapError::BuildFailed(format!("failed to read swap response: {}", e)))?;

        if !status.is_success() {
            warn!(status = %status, "Swap API returned an error");
            return Err(SwapError::BuildFailed(format!(
                "swap API returned {}: {}",
                status,
                api_error_message(&text)
            )));
        }

        let swap: SwapResponse = serde_json::from_str(&text)
            .map_err(|e| SwapError::BuildFailed(format!("malformed swap response: {}", e)))?;
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Swap API responded");
        Ok(swap)
    }
}

#[async_trait]
impl QuoteProvider for JupiterClient {
    async fn get_quote(&self, request: &SwapRequest) -> Result<Quote> {
        let raw = self.fetch_quote(request).await?;
        let quote = Quote::from_response(raw)
            .map_err(|e| SwapError::QuoteUnavailable(format!("malformed quote response: {:#}", e)))?;

        if quote.input_mint != request.input_mint || quote.output_mint != request.output_mint {
            return Err(SwapError::QuoteUnavailable(format!(
                "quote is for {} -> {}, requested {} -> {}",
                quote.input_mint, quote.output_mint, request.input_mint, request.output_mint
            )));
        }
        Ok(quote)
    }
}

#[async_trait]
impl TransactionBuilder for JupiterClient {
    async fn build_transaction(
        &self,
        quote: &Quote,
        user_public_key: &Pubkey,
        options: &BuildOptions,
    ) -> Result<UnsignedTransaction> {
        let swap = self.fetch_swap_transaction(quote, user_public_key, options).await?;

        let unsigned = UnsignedTransaction::from_base64(&swap.swap_transaction, swap.last_valid_block_height)
            .map_err(|e| SwapError::BuildFailed(format!("malformed swap transaction: {:#}", e)))?
            .with_fee_estimate(swap.prioritization_fee_lamports, swap.compute_unit_limit)
            .with_simulation_error(swap.simulation_error);

        if let Some(error) = unsigned.simulation_error() {
            warn!(error = %error, "Swap API simulation reported an error");
        }
        Ok(unsigned)
    }
}
