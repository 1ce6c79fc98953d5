//! Atlas Sources - Adapters for the two external intelligence sources.
//!
//! Each adapter turns one source's HTTP calls into typed payloads and
//! classifies its failures into [`SourceError`].
//!
//! # Adapters
//!
//! - [`BreachAdapter`]: one authenticated call to the breach index, keyed by
//!   email or username
//! - [`ProfileAdapter`]: six concurrent calls against the profile platform's
//!   sub-services, joined into a [`ProfileBundle`]. Only the identity call is
//!   fatal; the rest are best-effort enrichment.
//!
//! # Transport
//!
//! Adapters issue requests through the [`HttpTransport`] trait. Production
//! code uses [`ReqwestTransport`]; tests substitute an in-memory transport.
//!
//! ```rust,ignore
//! use atlas_sources::{BreachAdapter, BreachKind, ReqwestTransport};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(ReqwestTransport::new(&config.lookup)?);
//! let breach = BreachAdapter::new(transport, &config.breach, config.lookup.timeout());
//! let hits = breach.lookup("a@b.com", BreachKind::Email).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod breach;
pub mod error;
pub mod profile;
pub mod transport;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use breach::{BreachAdapter, BreachKind, BreachRecord};
pub use error::{Result, SourceError};
pub use profile::{GroupMembership, ProfileAdapter, ProfileBundle, UserInfo};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
