//! Maps adapter payloads into [`LookupReport`]s.

use crate::report::{Affiliation, AffiliationView, BreachReport, LookupReport, ProfileReport};
use atlas_sources::{BreachRecord, GroupMembership, ProfileBundle};
use chrono::{DateTime, Utc};

/// Number of affiliations shown before the "+N more" indicator.
pub const DISPLAYED_AFFILIATIONS: usize = 3;

/// Raw adapter output, tagged by the adapter that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Breach adapter hits
    Breach(Vec<BreachRecord>),
    /// Profile adapter six-call bundle
    Profile(ProfileBundle),
}

/// Normalize adapter output into a report.
///
/// Breach hits pass through untouched. Profile bundles get their missing
/// secondary fields defaulted (counts to 0, affiliations to empty) and their
/// affiliations truncated for display with the true total kept.
#[must_use]
pub fn normalize(raw: RawPayload) -> LookupReport {
    match raw {
        RawPayload::Breach(records) => LookupReport::Breach(BreachReport { records }),
        RawPayload::Profile(bundle) => LookupReport::Profile(normalize_profile(bundle)),
    }
}

fn normalize_profile(bundle: ProfileBundle) -> ProfileReport {
    let info = bundle.info;
    let created_at = DateTime::parse_from_rfc3339(&info.created)
        .ok()
        .map(|dt| dt.with_timezone(&Utc));

    ProfileReport {
        id: info.id,
        display_name: info.display_name,
        handle: info.name,
        description: info.description,
        created_at,
        created_raw: info.created,
        is_banned: info.is_banned,
        avatar_url: bundle.avatar_url,
        friends_count: bundle.friends_count.unwrap_or(0),
        followers_count: bundle.followers_count.unwrap_or(0),
        following_count: bundle.following_count.unwrap_or(0),
        affiliations: affiliation_view(bundle.groups.unwrap_or_default()),
    }
}

fn affiliation_view(groups: Vec<GroupMembership>) -> AffiliationView {
    let total_count = groups.len();
    let shown = groups
        .into_iter()
        .take(DISPLAYED_AFFILIATIONS)
        .map(|g| Affiliation {
            group_name: g.group_name,
            role_name: g.role_name,
            rank: g.rank,
        })
        .collect();

    AffiliationView { shown, total_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_sources::UserInfo;

    fn info() -> UserInfo {
        UserInfo {
            id: 1_610_000_000,
            name: "builderman_jr".to_string(),
            display_name: "Builder Jr".to_string(),
            description: String::new(),
            created: "2019-06-01T12:30:00.123Z".to_string(),
            is_banned: true,
        }
    }

    fn groups(n: usize) -> Vec<GroupMembership> {
        (0..n)
            .map(|i| GroupMembership {
                group_id: i as u64,
                group_name: format!("Group {i}"),
                role_name: "Member".to_string(),
                rank: 1,
            })
            .collect()
    }

    fn bare_bundle() -> ProfileBundle {
        ProfileBundle {
            info: info(),
            avatar_url: None,
            friends_count: None,
            followers_count: None,
            following_count: None,
            groups: None,
        }
    }

    #[test]
    fn test_breach_passes_through() {
        let records = vec![
            BreachRecord {
                sources: vec!["A".to_string()],
                password: Some("pw".to_string()),
                ..BreachRecord::default()
            },
            BreachRecord::default(),
        ];
        let report = normalize(RawPayload::Breach(records.clone()));
        assert_eq!(report, LookupReport::Breach(BreachReport { records }));
    }

    #[test]
    fn test_missing_secondaries_default() {
        let LookupReport::Profile(profile) = normalize(RawPayload::Profile(bare_bundle())) else {
            panic!("expected a profile report");
        };

        assert_eq!(profile.friends_count, 0);
        assert_eq!(profile.followers_count, 0);
        assert_eq!(profile.following_count, 0);
        assert_eq!(profile.avatar_url, None);
        assert!(profile.affiliations.shown.is_empty());
        assert_eq!(profile.affiliations.total_count, 0);
        assert!(profile.is_banned);
        assert_eq!(profile.handle, "builderman_jr");
    }

    #[test]
    fn test_affiliations_truncated_to_three() {
        let bundle = ProfileBundle {
            groups: Some(groups(5)),
            ..bare_bundle()
        };
        let LookupReport::Profile(profile) = normalize(RawPayload::Profile(bundle)) else {
            panic!("expected a profile report");
        };

        assert_eq!(profile.affiliations.shown.len(), 3);
        assert_eq!(profile.affiliations.total_count, 5);
        assert_eq!(profile.affiliations.hidden_count(), 2);
        assert_eq!(profile.affiliations.shown[0].group_name, "Group 0");
        assert_eq!(profile.affiliations.shown[2].group_name, "Group 2");
    }

    #[test]
    fn test_few_affiliations_shown_in_full() {
        let bundle = ProfileBundle {
            groups: Some(groups(2)),
            ..bare_bundle()
        };
        let LookupReport::Profile(profile) = normalize(RawPayload::Profile(bundle)) else {
            panic!("expected a profile report");
        };
        assert_eq!(profile.affiliations.shown.len(), 2);
        assert_eq!(profile.affiliations.hidden_count(), 0);
    }

    #[test]
    fn test_created_timestamp() {
        let LookupReport::Profile(profile) = normalize(RawPayload::Profile(bare_bundle())) else {
            panic!("expected a profile report");
        };
        let created = profile.created_at.expect("parsed timestamp");
        assert_eq!(created.to_rfc3339(), "2019-06-01T12:30:00.123+00:00");

        let mut bundle = bare_bundle();
        bundle.info.created = "sometime in 2019".to_string();
        let LookupReport::Profile(profile) = normalize(RawPayload::Profile(bundle)) else {
            panic!("expected a profile report");
        };
        assert_eq!(profile.created_at, None);
        assert_eq!(profile.created_raw, "sometime in 2019");
    }
}
