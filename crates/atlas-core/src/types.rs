//! Shared types used across the Atlas crates.

use crate::error::AtlasError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of target a caller declares for a query.
///
/// `Auto` asks the lookup engine to classify the query text itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchKind {
    /// Let the classifier decide
    #[default]
    Auto,
    /// Email address
    Email,
    /// Username / handle
    Username,
    /// Numeric Roblox user id
    RobloxId,
}

impl SearchKind {
    /// The concrete kind, or `None` for `Auto`.
    #[must_use]
    pub fn resolved(self) -> Option<ResolvedKind> {
        match self {
            Self::Auto => None,
            Self::Email => Some(ResolvedKind::Email),
            Self::Username => Some(ResolvedKind::Username),
            Self::RobloxId => Some(ResolvedKind::RobloxId),
        }
    }
}

impl FromStr for SearchKind {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "email" => Ok(Self::Email),
            "username" => Ok(Self::Username),
            "roblox" | "roblox-id" | "robloxid" | "roblox_id" => Ok(Self::RobloxId),
            other => Err(AtlasError::Validation(format!(
                "unknown search kind '{other}', expected auto, email, username or roblox-id"
            ))),
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Email => f.write_str("email"),
            Self::Username => f.write_str("username"),
            Self::RobloxId => f.write_str("roblox-id"),
        }
    }
}

/// A concrete target kind: the output of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedKind {
    /// Email address
    Email,
    /// Username / handle
    Username,
    /// Numeric Roblox user id
    RobloxId,
}

impl fmt::Display for ResolvedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Username => f.write_str("username"),
            Self::RobloxId => f.write_str("roblox-id"),
        }
    }
}

/// A caller's lookup credit.
///
/// Administrators hold an `Unbounded` balance that is never decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "amount")]
pub enum CreditBalance {
    /// No limit
    Unbounded,
    /// A finite number of remaining lookups
    Finite(u32),
}

impl CreditBalance {
    /// Whether at least one lookup can be paid for.
    #[must_use]
    pub fn has_credit(self) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Finite(n) => n > 0,
        }
    }

    /// Remaining credits, `None` when unbounded.
    #[must_use]
    pub fn remaining(self) -> Option<u32> {
        match self {
            Self::Unbounded => None,
            Self::Finite(n) => Some(n),
        }
    }
}

impl fmt::Display for CreditBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("INF"),
            Self::Finite(n) => write!(f, "{n}"),
        }
    }
}

/// Newtype for Roblox user ids.
///
/// Ids are non-empty runs of ASCII digits that fit in a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobloxId(u64);

impl RobloxId {
    /// Parse an id from query text.
    ///
    /// # Errors
    /// Returns error if the text is not purely ASCII digits or overflows `u64`.
    pub fn parse(text: &str) -> Result<Self, AtlasError> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AtlasError::Validation(format!(
                "invalid Roblox id: must be ASCII digits, got '{text}'"
            )));
        }

        text.parse::<u64>()
            .map(Self)
            .map_err(|e| AtlasError::Validation(format!("invalid Roblox id '{text}': {e}")))
    }

    /// Get the numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RobloxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
