pub mod common;
pub mod core;
pub mod lifecycle;

pub use common::{SignedTransaction, UnsignedTransaction};
pub use core::executor::SwapOrchestrator;
pub use core::params::{
    BuildOptions, ConfirmOptions, RouteRestriction, SubmitOptions, SwapParams, SwapRequest,
};
pub use core::traits::{LedgerClient, QuoteProvider, TransactionBuilder, TransactionSigner};
pub use core::types::{
    ConfirmationOutcome, ConfirmationStatus, PreparedSwap, Quote, RouteHop, SwapResult, SwapStage,
};
pub use lifecycle::{CallbackContext, CallbackRef, NoopCallback, TransactionLifecycleCallback};
