//! In-process session provider.
//!
//! Keeps accounts in memory. Used by the CLI and by tests in place of the
//! hosted backend.

use crate::error::{AuthError, Result};
use crate::provider::{CreditAdmin, SessionProvider};
use crate::session::{CreditPolicy, MetadataPatch, Session, SessionEvent, CREDITS_KEY};
use async_trait::async_trait;
use atlas_core::CreditBalance;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::{broadcast, Mutex};
use zeroize::Zeroizing;

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

struct Account {
    id: String,
    email: String,
    display_name: Option<String>,
    /// Zeroized when the account is dropped
    password: Zeroizing<String>,
    metadata: Map<String, Value>,
}

impl Account {
    fn to_session(&self) -> Session {
        Session {
            id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            metadata: self.metadata.clone(),
            signed_in_at: Utc::now(),
        }
    }
}

#[derive(Default)]
struct State {
    /// Keyed by lowercase email
    accounts: HashMap<String, Account>,
    /// Lowercase email of the signed-in account
    current: Option<String>,
}

/// Session provider backed by an in-memory account table.
pub struct MemorySessionProvider {
    state: Mutex<State>,
    events: broadcast::Sender<SessionEvent>,
    policy: CreditPolicy,
}

impl MemorySessionProvider {
    /// Create an empty provider using `policy` for admin checks and credit defaults.
    #[must_use]
    pub fn new(policy: CreditPolicy) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(State::default()),
            events,
            policy,
        }
    }

    /// Current balance of a registered account.
    pub async fn balance_of(&self, email: &str) -> Result<CreditBalance> {
        let state = self.state.lock().await;
        let account = state
            .accounts
            .get(&normalize_email(email))
            .ok_or_else(|| AuthError::UnknownAccount(email.to_string()))?;
        Ok(self
            .policy
            .balance_from_metadata(&account.email, &account.metadata))
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[async_trait]
impl SessionProvider for MemorySessionProvider {
    async fn get_session(&self) -> Option<Session> {
        let state = self.state.lock().await;
        let current = state.current.as_ref()?;
        state.accounts.get(current).map(Account::to_session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let key = normalize_email(email);
        let session = {
            let mut state = self.state.lock().await;
            let account = state
                .accounts
                .get(&key)
                .ok_or(AuthError::InvalidCredentials)?;
            if account.password.as_str() != password {
                tracing::debug!("Rejected sign-in for {}", account.id);
                return Err(AuthError::InvalidCredentials);
            }
            let session = account.to_session();
            state.current = Some(key);
            session
        };

        tracing::info!("Session started for {}", session.id);
        self.emit(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Session> {
        let key = normalize_email(email);
        let session = {
            let mut state = self.state.lock().await;
            if state.accounts.contains_key(&key) {
                return Err(AuthError::AccountExists(email.to_string()));
            }
            let account = Account {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.trim().to_string(),
                display_name: display_name.map(str::to_string),
                password: Zeroizing::new(password.to_string()),
                metadata: Map::new(),
            };
            let session = account.to_session();
            state.accounts.insert(key.clone(), account);
            state.current = Some(key);
            session
        };

        tracing::info!("Account registered: {}", session.id);
        self.emit(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        let had_session = self.state.lock().await.current.take().is_some();
        if had_session {
            tracing::info!("Session ended");
            self.emit(SessionEvent::SignedOut);
        }
        Ok(())
    }

    async fn update_metadata(&self, patch: MetadataPatch) -> Result<Session> {
        let mut state = self.state.lock().await;
        let current = state.current.clone().ok_or(AuthError::NotAuthenticated)?;
        let account = state
            .accounts
            .get_mut(&current)
            .ok_or(AuthError::NotAuthenticated)?;
        patch.apply_to(&mut account.metadata);
        Ok(account.to_session())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[async_trait]
impl CreditAdmin for MemorySessionProvider {
    async fn add_credits(&self, target_email: &str, amount: u32) -> Result<()> {
        if amount == 0 {
            return Err(AuthError::InvalidAmount(amount));
        }

        let mut state = self.state.lock().await;
        let caller = state.current.clone().ok_or(AuthError::NotAuthenticated)?;
        if !self.policy.is_admin(&caller) {
            return Err(AuthError::NotAdministrator);
        }

        let account = state
            .accounts
            .get_mut(&normalize_email(target_email))
            .ok_or_else(|| AuthError::UnknownAccount(target_email.to_string()))?;

        match self
            .policy
            .balance_from_metadata(&account.email, &account.metadata)
        {
            CreditBalance::Unbounded => {
                tracing::debug!("Credit injection for unbounded account is a no-op");
            }
            CreditBalance::Finite(current) => {
                let updated = current.saturating_add(amount);
                account
                    .metadata
                    .insert(CREDITS_KEY.to_string(), Value::from(updated));
                tracing::info!("Added {} credits to {}, now {}", amount, account.id, updated);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MemorySessionProvider {
        MemorySessionProvider::new(CreditPolicy {
            default_grant: 25,
            admin_email: Some("admin@atlas.test".to_string()),
        })
    }

    #[tokio::test]
    async fn test_sign_up_starts_session() {
        let provider = provider();
        let session = provider
            .sign_up("kai@example.com", "hunter2", Some("Kai"))
            .await
            .expect("sign up");
        assert_eq!(session.display_name_or_default(), "Kai");
        assert_eq!(
            provider.get_session().await.map(|s| s.id),
            Some(session.id)
        );
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() {
        let provider = provider();
        provider
            .sign_up("kai@example.com", "hunter2", None)
            .await
            .expect("sign up");
        let err = provider
            .sign_up("KAI@example.com", "other", None)
            .await
            .expect_err("duplicate account");
        assert!(matches!(err, AuthError::AccountExists(_)));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let provider = provider();
        provider
            .sign_up("kai@example.com", "hunter2", None)
            .await
            .expect("sign up");
        provider.sign_out().await.expect("sign out");

        let err = provider
            .sign_in("kai@example.com", "wrong")
            .await
            .expect_err("wrong password");
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(provider.get_session().await.is_none());
    }

    #[tokio::test]
    async fn test_update_metadata_requires_session() {
        let provider = provider();
        let err = provider
            .update_metadata(MetadataPatch::credits(3))
            .await
            .expect_err("no session");
        assert!(matches!(err, AuthError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let provider = provider();
        let mut events = provider.subscribe();

        provider
            .sign_up("kai@example.com", "hunter2", None)
            .await
            .expect("sign up");
        provider.sign_out().await.expect("sign out");

        assert!(matches!(
            events.recv().await.expect("first event"),
            SessionEvent::SignedIn(_)
        ));
        assert_eq!(
            events.recv().await.expect("second event"),
            SessionEvent::SignedOut
        );
    }

    #[tokio::test]
    async fn test_add_credits_requires_admin() {
        let provider = provider();
        provider
            .sign_up("kai@example.com", "hunter2", None)
            .await
            .expect("sign up");

        let err = provider
            .add_credits("kai@example.com", 10)
            .await
            .expect_err("not admin");
        assert!(matches!(err, AuthError::NotAdministrator));
    }

    #[tokio::test]
    async fn test_add_credits_as_admin() {
        let provider = provider();
        provider
            .sign_up("kai@example.com", "hunter2", None)
            .await
            .expect("sign up");
        provider
            .update_metadata(MetadataPatch::credits(2))
            .await
            .expect("set credits");
        provider
            .sign_up("admin@atlas.test", "root", None)
            .await
            .expect("admin sign up");

        provider
            .add_credits("kai@example.com", 100)
            .await
            .expect("add credits");
        assert_eq!(
            provider.balance_of("kai@example.com").await.expect("balance"),
            CreditBalance::Finite(102)
        );

        let err = provider
            .add_credits("ghost@example.com", 1)
            .await
            .expect_err("unknown target");
        assert!(matches!(err, AuthError::UnknownAccount(_)));

        let err = provider
            .add_credits("kai@example.com", 0)
            .await
            .expect_err("zero amount");
        assert!(matches!(err, AuthError::InvalidAmount(0)));
    }
}
