//! Normalized report types returned to callers.

use atlas_sources::BreachRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of one successful lookup.
///
/// Consumers match exhaustively on the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum LookupReport {
    /// Breach index hits for an email or username
    Breach(BreachReport),
    /// Joined profile for a platform user id
    Profile(ProfileReport),
}

/// Breach hits, exactly as returned by the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreachReport {
    /// One entry per hit
    pub records: Vec<BreachRecord>,
}

impl BreachReport {
    /// Number of hits.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.records.len()
    }

    /// Whether the index returned no hits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A platform user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileReport {
    /// Platform user id
    pub id: u64,
    /// Display name
    pub display_name: String,
    /// Account handle
    pub handle: String,
    /// Profile bio
    pub description: String,
    /// Account creation time, when the platform sent a parseable timestamp
    pub created_at: Option<DateTime<Utc>>,
    /// Creation timestamp as sent by the platform
    pub created_raw: String,
    /// Whether the account is banned
    pub is_banned: bool,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Friend count
    pub friends_count: u64,
    /// Follower count
    pub followers_count: u64,
    /// Following count
    pub following_count: u64,
    /// Group memberships, truncated for display
    pub affiliations: AffiliationView,
}

/// A group membership with the user's role in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliation {
    /// Group name
    pub group_name: String,
    /// Role name within the group
    pub role_name: String,
    /// Role rank
    pub rank: u32,
}

/// The first few affiliations plus the true total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationView {
    /// Affiliations to display
    pub shown: Vec<Affiliation>,
    /// Total number of affiliations the user has
    pub total_count: usize,
}

impl AffiliationView {
    /// How many affiliations were left out of `shown` ("+N more").
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.total_count.saturating_sub(self.shown.len())
    }
}
