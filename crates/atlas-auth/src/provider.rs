//! Session provider traits.

use crate::error::Result;
use crate::session::{CreditPolicy, MetadataPatch, Session, SessionEvent};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// The hosted backend that owns accounts and sessions.
///
/// Implementations must be thread-safe (Send + Sync) so one provider can be
/// shared between the dashboard and the lookup engine.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current session, if any.
    async fn get_session(&self) -> Option<Session>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Register a new account and sign it in.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Session>;

    /// End the current session.
    async fn sign_out(&self) -> Result<()>;

    /// Merge `patch` into the current session's metadata.
    async fn update_metadata(&self, patch: MetadataPatch) -> Result<Session>;

    /// Subscribe to sign-in/sign-out notifications.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Administrator-only credit injection.
#[async_trait]
pub trait CreditAdmin: Send + Sync {
    /// Add `amount` credits to the account registered for `target_email`.
    ///
    /// # Errors
    /// Fails with `NotAdministrator` unless the caller is the administrator,
    /// `UnknownAccount` for an unregistered target and `InvalidAmount` for zero.
    async fn add_credits(&self, target_email: &str, amount: u32) -> Result<()>;
}

/// Seed the default grant on a session that has no credit record yet.
///
/// The administrator is never seeded. Returns the session as it stands after
/// any update.
pub async fn ensure_credit_grant(
    provider: &dyn SessionProvider,
    session: Session,
    policy: &CreditPolicy,
) -> Result<Session> {
    if policy.is_admin(&session.email) || session.has_credit_record() {
        return Ok(session);
    }

    tracing::info!(
        "Seeding {} credits for new account {}",
        policy.default_grant,
        session.id
    );
    provider
        .update_metadata(MetadataPatch::credits(policy.default_grant))
        .await
}
