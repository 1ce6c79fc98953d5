//! Query classification.

use atlas_core::ResolvedKind;
use regex::Regex;
use std::sync::OnceLock;

/// Classify raw query text into a target kind.
///
/// Rules, first match wins:
/// 1. contains `@` → `Email`
/// 2. 5 to 15 ASCII digits and nothing else → `RobloxId`
/// 3. otherwise → `Username`
///
/// Empty text falls through to `Username`; callers reject it first.
#[must_use]
pub fn classify(text: &str) -> ResolvedKind {
    static PROFILE_ID: OnceLock<Regex> = OnceLock::new();
    let profile_id = PROFILE_ID.get_or_init(|| Regex::new(r"^[0-9]{5,15}$").expect("valid regex"));

    if text.contains('@') {
        ResolvedKind::Email
    } else if profile_id.is_match(text) {
        ResolvedKind::RobloxId
    } else {
        ResolvedKind::Username
    }
}
