//! Plain-text rendering of lookup reports.

use atlas_lookup::{BreachReport, LookupReport, ProfileReport};
use std::fmt::Write;

/// Render a report for the terminal.
pub fn render_report(report: &LookupReport) -> String {
    match report {
        LookupReport::Breach(breach) => render_breach(breach),
        LookupReport::Profile(profile) => render_profile(profile),
    }
}

fn render_breach(report: &BreachReport) -> String {
    if report.is_empty() {
        return "No breach records.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Breach records: {}", report.hit_count());
    for (i, record) in report.records.iter().enumerate() {
        let _ = writeln!(out, "[{}] {}", i + 1, record.source_label());
        let fields = [
            ("email", &record.email),
            ("username", &record.username),
            ("password", &record.password),
            ("hash", &record.hash),
            ("date", &record.date),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "    {:<9} {}", format!("{label}:"), value);
            }
        }
    }
    out
}

fn render_profile(profile: &ProfileReport) -> String {
    let mut out = String::new();

    let banned = if profile.is_banned { "  [BANNED]" } else { "" };
    let _ = writeln!(
        out,
        "{} (@{}){}",
        profile.display_name, profile.handle, banned
    );
    let _ = writeln!(out, "ID:        {}", profile.id);

    let created = profile.created_at.map_or_else(
        || profile.created_raw.clone(),
        |dt| dt.format("%Y-%m-%d").to_string(),
    );
    if !created.is_empty() {
        let _ = writeln!(out, "Created:   {created}");
    }

    let _ = writeln!(
        out,
        "Friends:   {}  Followers: {}  Following: {}",
        profile.friends_count, profile.followers_count, profile.following_count
    );
    if let Some(url) = &profile.avatar_url {
        let _ = writeln!(out, "Avatar:    {url}");
    }
    if !profile.description.trim().is_empty() {
        let _ = writeln!(out, "Bio:       {}", profile.description.trim());
    }

    let view = &profile.affiliations;
    if view.total_count == 0 {
        let _ = writeln!(out, "Groups:    none");
    } else {
        let _ = writeln!(out, "Groups:");
        for group in &view.shown {
            let _ = writeln!(
                out,
                "  - {} ({}, rank {})",
                group.group_name, group.role_name, group.rank
            );
        }
        if view.hidden_count() > 0 {
            let _ = writeln!(out, "  +{} more groups", view.hidden_count());
        }
    }

    out
}
