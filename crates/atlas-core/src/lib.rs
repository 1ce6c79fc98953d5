//! Atlas Core - Foundation crate for the Atlas lookup engine.
//!
//! This crate provides the shared vocabulary that the session, source and
//! lookup crates agree on: search kinds, credit balances, platform ids, the
//! central error type, and TOML configuration.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes and enums (`SearchKind`, `ResolvedKind`, `CreditBalance`, `RobloxId`)
//!
//! # Example
//!
//! ```rust
//! use atlas_core::{AppConfig, CreditBalance};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.credits.default_grant, 25);
//!
//! let balance = CreditBalance::Finite(config.credits.default_grant);
//! assert!(balance.has_credit());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BreachConfig, CreditsConfig, LookupConfig, ProfileConfig};
pub use error::{AtlasError, ConfigError, ConfigResult, Result};
pub use types::{CreditBalance, ResolvedKind, RobloxId, SearchKind};
