pub mod executor;
pub mod params;
pub mod traits;
pub mod types;
