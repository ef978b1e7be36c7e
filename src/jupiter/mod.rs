//! Jupiter swap API
//!
//! Quote provider and transaction builder backed by the aggregator's HTTP API.

pub mod client;
pub mod priority_fee;
pub mod types;

pub use client::JupiterClient;
pub use priority_fee::{PriorityFeePolicy, PriorityLevel};
