//! Profile platform adapter.
//!
//! A profile is assembled from six sub-service calls keyed by the same user
//! id, issued concurrently:
//!
//! ```text
//! identity  GET {users}/users/{id}                      (fatal)
//! avatar    GET {thumbnails}/users/avatar?userIds={id}  (best-effort)
//! friends   GET {friends}/users/{id}/friends/count      (best-effort)
//! followers GET {friends}/users/{id}/followers/count    (best-effort)
//! following GET {friends}/users/{id}/followings/count   (best-effort)
//! groups    GET {groups}/users/{id}/groups/roles        (best-effort)
//! ```
//!
//! The join short-circuits on an identity failure and drops the other calls.

use crate::error::{Result, SourceError};
use crate::transport::{fetch, HttpRequest, HttpTransport};
use atlas_core::{ProfileConfig, RobloxId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const IDENTITY: &str = "profile-identity";
const AVATAR: &str = "profile-avatar";
const FRIENDS: &str = "profile-friends";
const FOLLOWERS: &str = "profile-followers";
const FOLLOWING: &str = "profile-following";
const GROUPS: &str = "profile-groups";

/// Identity record from the users service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Platform user id
    pub id: u64,
    /// Account handle
    pub name: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Profile bio
    #[serde(default)]
    pub description: String,
    /// Account creation timestamp as sent by the platform
    #[serde(default)]
    pub created: String,
    /// Whether the account is banned
    #[serde(default)]
    pub is_banned: bool,
}

/// One group the user belongs to, with their role in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    /// Group id
    pub group_id: u64,
    /// Group name
    pub group_name: String,
    /// Role name within the group
    pub role_name: String,
    /// Role rank (0-255 on the platform)
    pub rank: u32,
}

/// Raw result of the six-call fan-out.
///
/// Secondary fields are `None` when their call failed or returned nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBundle {
    /// Identity record (always present)
    pub info: UserInfo,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Friend count
    pub friends_count: Option<u64>,
    /// Follower count
    pub followers_count: Option<u64>,
    /// Following count
    pub following_count: Option<u64>,
    /// Group memberships
    pub groups: Option<Vec<GroupMembership>>,
}

// Platform API types

#[derive(Debug, Deserialize)]
struct ThumbnailResponse {
    #[serde(default)]
    data: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Thumbnail {
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct GroupRolesResponse {
    #[serde(default)]
    data: Vec<GroupRoleEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupRoleEntry {
    group: GroupInfo,
    role: RoleInfo,
}

#[derive(Debug, Deserialize)]
struct GroupInfo {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RoleInfo {
    name: String,
    #[serde(default)]
    rank: u32,
}

impl From<GroupRoleEntry> for GroupMembership {
    fn from(entry: GroupRoleEntry) -> Self {
        Self {
            group_id: entry.group.id,
            group_name: entry.group.name,
            role_name: entry.role.name,
            rank: entry.role.rank,
        }
    }
}

/// Client for the profile platform's sub-services.
pub struct ProfileAdapter {
    transport: Arc<dyn HttpTransport>,
    users_base_url: String,
    thumbnails_base_url: String,
    friends_base_url: String,
    groups_base_url: String,
    avatar_size: String,
    timeout: Duration,
}

impl ProfileAdapter {
    /// Create an adapter from the profile settings and the per-call timeout.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, config: &ProfileConfig, timeout: Duration) -> Self {
        let trim = |url: &str| url.trim_end_matches('/').to_string();
        Self {
            transport,
            users_base_url: trim(&config.users_base_url),
            thumbnails_base_url: trim(&config.thumbnails_base_url),
            friends_base_url: trim(&config.friends_base_url),
            groups_base_url: trim(&config.groups_base_url),
            avatar_size: config.avatar_size.clone(),
            timeout,
        }
    }

    /// Fetch and join the six sub-service results for `id`.
    ///
    /// Text that is not a numeric id fails with `NotFound` without any call.
    ///
    /// # Errors
    /// - `NotFound` when the identity call returns 404
    /// - `Upstream`/`Timeout`/`Transport` for any other identity failure
    pub async fn lookup(&self, id: &str) -> Result<ProfileBundle> {
        let id = RobloxId::parse(id).map_err(|e| {
            tracing::debug!("Rejecting profile lookup: {}", e);
            SourceError::NotFound { service: IDENTITY }
        })?;

        tracing::debug!("Fetching profile {} from 6 sub-services", id);

        let (info, avatar_url, friends_count, followers_count, following_count, groups) = tokio::try_join!(
            self.fetch_identity(id),
            best_effort(self.fetch_avatar(id)),
            best_effort(self.fetch_count(FRIENDS, "friends", id)),
            best_effort(self.fetch_count(FOLLOWERS, "followers", id)),
            best_effort(self.fetch_count(FOLLOWING, "followings", id)),
            best_effort(self.fetch_groups(id)),
        )?;

        Ok(ProfileBundle {
            info,
            avatar_url,
            friends_count,
            followers_count,
            following_count,
            groups,
        })
    }

    /// URLs of the six calls, in identity/avatar/friends/followers/following/groups order.
    #[must_use]
    pub fn urls_for(&self, id: RobloxId) -> [String; 6] {
        [
            self.identity_url(id),
            self.avatar_url(id),
            self.count_url("friends", id),
            self.count_url("followers", id),
            self.count_url("followings", id),
            self.groups_url(id),
        ]
    }

    fn identity_url(&self, id: RobloxId) -> String {
        format!("{}/users/{id}", self.users_base_url)
    }

    fn avatar_url(&self, id: RobloxId) -> String {
        format!(
            "{}/users/avatar?userIds={id}&size={}&format=Png&isCircular=false",
            self.thumbnails_base_url, self.avatar_size
        )
    }

    fn count_url(&self, relation: &str, id: RobloxId) -> String {
        format!("{}/users/{id}/{relation}/count", self.friends_base_url)
    }

    fn groups_url(&self, id: RobloxId) -> String {
        format!("{}/users/{id}/groups/roles", self.groups_base_url)
    }

    async fn fetch_identity(&self, id: RobloxId) -> Result<UserInfo> {
        let request = HttpRequest::get(self.identity_url(id)).header("Accept", "application/json");
        let response = fetch(self.transport.as_ref(), &request, self.timeout, IDENTITY).await?;

        if response.status == 404 {
            return Err(SourceError::NotFound { service: IDENTITY });
        }
        if !response.is_success() {
            return Err(SourceError::Upstream {
                service: IDENTITY,
                status: response.status,
                message: format!("profile API error for user {id}"),
            });
        }

        response.json().map_err(|e| SourceError::Upstream {
            service: IDENTITY,
            status: response.status,
            message: format!("malformed identity payload: {e}"),
        })
    }

    async fn fetch_avatar(&self, id: RobloxId) -> Option<String> {
        let thumbnails: ThumbnailResponse = self.fetch_optional(AVATAR, self.avatar_url(id)).await?;
        thumbnails
            .data
            .into_iter()
            .find_map(|t| t.image_url.filter(|url| !url.is_empty()))
    }

    async fn fetch_count(&self, service: &'static str, relation: &str, id: RobloxId) -> Option<u64> {
        let count: CountResponse = self
            .fetch_optional(service, self.count_url(relation, id))
            .await?;
        Some(count.count)
    }

    async fn fetch_groups(&self, id: RobloxId) -> Option<Vec<GroupMembership>> {
        let roles: GroupRolesResponse = self.fetch_optional(GROUPS, self.groups_url(id)).await?;
        Some(roles.data.into_iter().map(GroupMembership::from).collect())
    }

    /// Fetch and decode a secondary payload, absorbing every failure.
    async fn fetch_optional<T: DeserializeOwned>(&self, service: &'static str, url: String) -> Option<T> {
        let request = HttpRequest::get(url).header("Accept", "application/json");
        let response = match fetch(self.transport.as_ref(), &request, self.timeout, service).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Secondary profile call failed, using default: {}", e);
                return None;
            }
        };

        if !response.is_success() {
            tracing::warn!(
                "Secondary profile call {} returned status {}, using default",
                service,
                response.status
            );
            return None;
        }

        match response.json() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Secondary profile call {} returned malformed payload: {}", service, e);
                None
            }
        }
    }
}

/// Lift an infallible secondary call into the join's error type.
async fn best_effort<T>(call: impl Future<Output = T>) -> Result<T> {
    Ok(call.await)
}
