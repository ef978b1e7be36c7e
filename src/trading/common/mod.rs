pub mod transaction_builder;
pub mod utils;

pub use transaction_builder::{SignedTransaction, UnsignedTransaction, sign_unsigned};
pub use utils::{parse_amount, parse_mint, validate_slippage};
