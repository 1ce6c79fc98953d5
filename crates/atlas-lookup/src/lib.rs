//! Atlas Lookup - Universal lookup aggregation.
//!
//! Takes one free-text query, classifies it, charges one credit, dispatches
//! it to the breach index or the profile platform, and normalizes the result
//! into a single tagged [`LookupReport`].
//!
//! ```text
//! Query → classify (if auto) → credit gate → adapter → normalize → LookupReport
//!                                   ↓
//!                     persist balance (best-effort, concurrent)
//! ```
//!
//! Credit is spent on the attempt, not on success: the gate's decrement is
//! never rolled back when the adapter fails afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_core::{AppConfig, CreditBalance, SearchKind};
//! use atlas_lookup::{LookupOrchestrator, Query};
//!
//! let orchestrator = LookupOrchestrator::from_config(&AppConfig::load_with_env()?)?;
//! let query = Query::new("a@b.com", SearchKind::Auto);
//!
//! if let Some(outcome) = orchestrator.execute(&query, CreditBalance::Finite(5)).await {
//!     println!("remaining: {}", outcome.balance);
//!     match outcome.result {
//!         Ok(report) => println!("{report:?}"),
//!         Err(e) => eprintln!("{}", e.user_message()),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod classifier;
pub mod error;
pub mod gate;
pub mod normalizer;
pub mod orchestrator;
pub mod report;

pub use classifier::classify;
pub use error::{LookupError, Result};
pub use gate::authorize;
pub use normalizer::{normalize, RawPayload, DISPLAYED_AFFILIATIONS};
pub use orchestrator::{LookupOrchestrator, LookupOutcome, Query};
pub use report::{Affiliation, AffiliationView, BreachReport, LookupReport, ProfileReport};

// Re-export the record type that flows through unchanged
pub use atlas_sources::BreachRecord;
