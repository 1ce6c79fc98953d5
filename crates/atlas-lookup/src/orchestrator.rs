//! Lookup orchestration.
//!
//! This module provides the `LookupOrchestrator`, which owns one lookup's
//! lifecycle: classification, the credit gate, dispatch to an adapter,
//! normalization, and best-effort persistence of the spent credit.

use crate::classifier::classify;
use crate::error::Result;
use crate::gate::authorize;
use crate::normalizer::{normalize, RawPayload};
use crate::report::LookupReport;
use atlas_auth::{MetadataPatch, SessionProvider};
use atlas_core::{AppConfig, CreditBalance, ResolvedKind, SearchKind};
use atlas_sources::{
    BreachAdapter, BreachKind, HttpTransport, ProfileAdapter, ReqwestTransport, SourceError,
};
use std::sync::Arc;
use std::time::Duration;

/// One submitted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Raw text as typed
    pub text: String,
    /// Kind chosen by the caller, `Auto` to classify
    pub declared_kind: SearchKind,
}

impl Query {
    /// Create a query.
    #[must_use]
    pub fn new(text: impl Into<String>, declared_kind: SearchKind) -> Self {
        Self {
            text: text.into(),
            declared_kind,
        }
    }
}

/// Everything one lookup attempt produced.
///
/// `balance` is the balance after the gate ran, whether or not the lookup
/// itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    /// Kind the query was dispatched as
    pub kind: ResolvedKind,
    /// Balance after this attempt
    pub balance: CreditBalance,
    /// Report or failure
    pub result: Result<LookupReport>,
}

/// Coordinates classifier, credit gate, adapters and normalizer.
///
/// Concurrent `execute` calls for the same balance are not coordinated here;
/// callers serialize them (e.g. by disabling submit while one is in flight).
pub struct LookupOrchestrator {
    breach: BreachAdapter,
    profile: ProfileAdapter,
    session: Option<Arc<dyn SessionProvider>>,
    timeout: Duration,
}

impl LookupOrchestrator {
    /// Create an orchestrator from ready-made adapters.
    ///
    /// `timeout` bounds the credit persistence write.
    #[must_use]
    pub fn new(breach: BreachAdapter, profile: ProfileAdapter, timeout: Duration) -> Self {
        Self {
            breach,
            profile,
            session: None,
            timeout,
        }
    }

    /// Create an orchestrator whose adapters share `transport`.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>, config: &AppConfig) -> Self {
        let timeout = config.lookup.timeout();
        Self::new(
            BreachAdapter::new(transport.clone(), &config.breach, timeout),
            ProfileAdapter::new(transport, &config.profile, timeout),
            timeout,
        )
    }

    /// Create an orchestrator talking to the real services.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn from_config(config: &AppConfig) -> std::result::Result<Self, SourceError> {
        let transport = Arc::new(ReqwestTransport::new(&config.lookup)?);
        Ok(Self::with_transport(transport, config))
    }

    /// Persist spent credit to `provider` after each charged lookup.
    #[must_use]
    pub fn with_session_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(provider);
        self
    }

    /// Run one lookup.
    ///
    /// Returns `None` when the query is empty or whitespace: nothing was
    /// submitted, nothing was charged. Otherwise the gate runs before any
    /// network call; a refused gate returns `InsufficientCredit` with the
    /// balance untouched. An authorized lookup is charged even if it then
    /// fails.
    pub async fn execute(&self, query: &Query, balance: CreditBalance) -> Option<LookupOutcome> {
        let text = query.text.trim();
        if text.is_empty() {
            tracing::debug!("Ignoring empty query");
            return None;
        }

        let kind = query
            .declared_kind
            .resolved()
            .unwrap_or_else(|| classify(text));

        let balance = match authorize(balance) {
            Ok(updated) => updated,
            Err(e) => {
                tracing::info!("Lookup refused: {}", e);
                return Some(LookupOutcome {
                    kind,
                    balance,
                    result: Err(e),
                });
            }
        };

        tracing::info!("Lookup started as {} (remaining credit: {})", kind, balance);

        let (result, ()) = tokio::join!(self.dispatch(text, kind), self.persist_balance(balance));

        match &result {
            Ok(_) => tracing::info!("Lookup completed as {}", kind),
            Err(e) if e.is_transient() => tracing::warn!("Lookup failed: {}", e),
            Err(e) => tracing::info!("Lookup failed: {}", e),
        }

        Some(LookupOutcome {
            kind,
            balance,
            result,
        })
    }

    async fn dispatch(&self, text: &str, kind: ResolvedKind) -> Result<LookupReport> {
        let raw = match BreachKind::from_resolved(kind) {
            Some(breach_kind) => RawPayload::Breach(self.breach.lookup(text, breach_kind).await?),
            None => RawPayload::Profile(self.profile.lookup(text).await?),
        };
        Ok(normalize(raw))
    }

    /// Write the decremented balance back to the session provider.
    ///
    /// Failures and timeouts are logged; the local balance stays authoritative.
    async fn persist_balance(&self, balance: CreditBalance) {
        let (Some(provider), Some(remaining)) = (&self.session, balance.remaining()) else {
            return;
        };

        let write = provider.update_metadata(MetadataPatch::credits(remaining));
        match tokio::time::timeout(self.timeout, write).await {
            Ok(Ok(_)) => tracing::debug!("Persisted credit balance {}", remaining),
            Ok(Err(e)) => tracing::warn!("Failed to persist credit balance {}: {}", remaining, e),
            Err(_) => tracing::warn!(
                "Persisting credit balance {} timed out after {:?}",
                remaining,
                self.timeout
            ),
        }
    }
}
