//! Mutation type discriminators for idempotent operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of mutation protected by an idempotency key.
///
/// Keys are isolated per mutation kind so two operations that happen to reuse
/// the same UUID cannot replay each other's responses. New idempotent
/// endpoints add a variant here and a matching wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    /// Deal funding (`POST /api/investor/deals`).
    Deals,
}

impl MutationType {
    /// All mutation type variants.
    pub const ALL: [MutationType; 1] = [MutationType::Deals];

    /// Returns the wire and database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deals => "deals",
        }
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an invalid mutation type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMutationTypeError {
    /// The invalid input string.
    pub input: String,
}

impl fmt::Display for ParseMutationTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variants: Vec<_> = MutationType::ALL.iter().map(|v| v.as_str()).collect();
        write!(
            f,
            "invalid mutation type '{}': expected one of {}",
            self.input,
            variants.join(", ")
        )
    }
}

impl std::error::Error for ParseMutationTypeError {}

impl FromStr for MutationType {
    type Err = ParseMutationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseMutationTypeError {
                input: s.to_owned(),
            })
    }
}
