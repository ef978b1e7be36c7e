pub mod error;
pub mod types;

pub use error::{ErrorKind, Result, SwapError, SwapFailure};
pub use types::*;
