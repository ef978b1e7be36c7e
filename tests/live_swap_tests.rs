//! Live network tests
//!
//! Hit the public Jupiter API and, for execution, a funded wallet. Ignored by
//! default.
//!
//! ## Running
//!
//! ```bash
//! # quote only
//! cargo test --test live_swap_tests -- --ignored live_quote_sol_to_usdc --nocapture
//!
//! # real swap (spends funds): set SOLANA_PRIVATE_KEY and SOLANA_RPC_URL in .env
//! cargo test --test live_swap_tests -- --ignored live_swap_small_sol_to_usdc --nocapture
//! ```

use sol_swap_executor::SwapClient;
use sol_swap_executor::common::{Network, SwapConfig};
use sol_swap_executor::constants::{SOL_MINT, USDC_MINT};
use sol_swap_executor::trading::{ConfirmationStatus, SwapParams};

#[tokio::test]
#[ignore]
async fn live_quote_sol_to_usdc() {
    let _ = dotenvy::dotenv();
    let client = SwapClient::new(SwapConfig::for_network(Network::MainnetBeta)).unwrap();

    let params =
        SwapParams::new(SOL_MINT.to_string(), USDC_MINT.to_string(), "1000000000").with_slippage_bps(50);
    let quote = client.get_quote(&params).await.unwrap();

    println!("1 SOL -> {} USDC base units via {:?}", quote.out_amount, quote.route_labels());
    assert_eq!(quote.output_mint, USDC_MINT);
    assert!(quote.out_amount > 0);
}

#[tokio::test]
#[ignore]
async fn live_swap_small_sol_to_usdc() {
    let _ = dotenvy::dotenv();
    let client = SwapClient::from_env().unwrap();
    if !client.can_execute() {
        println!("SOLANA_PRIVATE_KEY not set, skipping");
        return;
    }

    // 0.001 SOL
    let params =
        SwapParams::new(SOL_MINT.to_string(), USDC_MINT.to_string(), "1000000").with_slippage_bps(100);
    match client.execute_swap(&params).await {
        Ok(result) => {
            println!("{}", result.to_json());
            assert_eq!(result.confirmation_status, ConfirmationStatus::Confirmed);
        },
        Err(err) => panic!("{}", serde_json::to_string_pretty(&err.to_failure()).unwrap()),
    }
}
