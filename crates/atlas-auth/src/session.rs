//! Session values and the credit rules read from them.

use atlas_core::{CreditBalance, CreditsConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the remaining credit count.
pub const CREDITS_KEY: &str = "credits";

/// A signed-in session as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Provider-assigned account id
    pub id: String,
    /// Account email
    pub email: String,
    /// Name shown in the dashboard header
    pub display_name: Option<String>,
    /// Free-form user metadata (holds `credits`)
    pub metadata: Map<String, Value>,
    /// When this session was established
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Display name, falling back to the dashboard's default title.
    #[must_use]
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Operative")
    }

    /// Whether the metadata carries a `credits` entry.
    #[must_use]
    pub fn has_credit_record(&self) -> bool {
        self.metadata
            .get(CREDITS_KEY)
            .is_some_and(|v| !v.is_null())
    }
}

/// Change notification emitted by a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A session was established (sign-in, sign-up or restored)
    SignedIn(Session),
    /// The session ended
    SignedOut,
}

/// A partial metadata update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataPatch(Map<String, Value>);

impl MetadataPatch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that sets the credit count.
    #[must_use]
    pub fn credits(amount: u32) -> Self {
        Self::new().set(CREDITS_KEY, Value::from(amount))
    }

    /// Set one key.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Merge this patch into existing metadata.
    pub fn apply_to(&self, metadata: &mut Map<String, Value>) {
        for (key, value) in &self.0 {
            metadata.insert(key.clone(), value.clone());
        }
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rules for turning session metadata into a [`CreditBalance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditPolicy {
    /// Credits granted when none are recorded
    pub default_grant: u32,
    /// Account holding an unbounded balance
    pub admin_email: Option<String>,
}

impl CreditPolicy {
    /// Whether `email` is the administrator account.
    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }

    /// Balance for a session.
    #[must_use]
    pub fn balance_for(&self, session: &Session) -> CreditBalance {
        self.balance_from_metadata(&session.email, &session.metadata)
    }

    /// Balance from raw email and metadata.
    ///
    /// Numeric strings are accepted, negative values clamp to zero, and a
    /// missing or unparsable value yields the default grant.
    #[must_use]
    pub fn balance_from_metadata(&self, email: &str, metadata: &Map<String, Value>) -> CreditBalance {
        if self.is_admin(email) {
            return CreditBalance::Unbounded;
        }

        match metadata.get(CREDITS_KEY).and_then(parse_credits) {
            Some(n) => CreditBalance::Finite(u32::try_from(n.max(0)).unwrap_or(u32::MAX)),
            None => CreditBalance::Finite(self.default_grant),
        }
    }
}

/// Read a stored credit count the way the dashboard wrote it.
///
/// Fractional numbers truncate toward zero. Strings yield their leading
/// integer (`"12abc"` is 12) and nothing when they do not start with one.
#[allow(clippy::cast_possible_truncation)]
fn parse_credits(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let magnitude = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

impl From<&CreditsConfig> for CreditPolicy {
    fn from(config: &CreditsConfig) -> Self {
        Self {
            default_grant: config.default_grant,
            admin_email: config.admin_email.clone(),
        }
    }
}
