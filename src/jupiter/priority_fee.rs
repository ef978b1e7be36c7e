//! Priority fee policy sent with `/swap`
//!
//! Jupiter estimates the compute unit price from recent fees at the chosen
//! percentile level and clamps the total at `maxLamports`.

use anyhow::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fee percentile level understood by the swap API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityLevel {
    Medium,
    High,
    VeryHigh,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Medium => "medium",
            PriorityLevel::High => "high",
            PriorityLevel::VeryHigh => "veryHigh",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "medium" => Ok(PriorityLevel::Medium),
            "high" => Ok(PriorityLevel::High),
            "veryhigh" | "very_high" | "very-high" => Ok(PriorityLevel::VeryHigh),
            _ => anyhow::bail!("Invalid priority level: {}", s),
        }
    }
}

impl Serialize for PriorityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// How the priority fee of a built swap is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityFeePolicy {
    /// Estimated at `level`, capped at `max_lamports`
    Auto { max_lamports: u64, level: PriorityLevel },
    /// Exact fee in lamports
    Fixed(u64),
    /// No priority fee
    Disabled,
}

impl PriorityFeePolicy {
    /// Upper bound on the fee this policy can spend, in lamports
    pub fn max_lamports(&self) -> u64 {
        match self {
            PriorityFeePolicy::Auto { max_lamports, .. } => *max_lamports,
            PriorityFeePolicy::Fixed(lamports) => *lamports,
            PriorityFeePolicy::Disabled => 0,
        }
    }
}

// Wire shape of `prioritizationFeeLamports`:
//   Auto     -> {"priorityLevelWithMaxLamports": {"maxLamports": N, "priorityLevel": "veryHigh"}}
//   Fixed(n) -> n
//   Disabled -> 0
impl Serialize for PriorityFeePolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PriorityFeePolicy::Auto { max_lamports, level } => {
                let mut outer = serializer.serialize_map(Some(1))?;
                outer.serialize_entry(
                    "priorityLevelWithMaxLamports",
                    &PriorityLevelWithMaxLamports { max_lamports: *max_lamports, level: *level },
                )?;
                outer.end()
            },
            PriorityFeePolicy::Fixed(lamports) => serializer.serialize_u64(*lamports),
            PriorityFeePolicy::Disabled => serializer.serialize_u64(0),
        }
    }
}

struct PriorityLevelWithMaxLamports {
    max_lamports: u64,
    level: PriorityLevel,
}

impl Serialize for PriorityLevelWithMaxLamports {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("maxLamports", &self.max_lamports)?;
        map.serialize_entry("priorityLevel", &self.level)?;
        map.end()
    }
}
