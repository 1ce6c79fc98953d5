//! Atlas Authentication Layer
//!
//! The hosted session provider owns sign-in and credential storage. This crate
//! describes that provider at its boundary and adds the credit rules the
//! lookup engine relies on.
//!
//! # Credit Metadata
//!
//! - The administrator account always holds an unbounded balance
//! - Everyone else carries a `credits` integer in their session metadata
//! - A session without one is seeded with the configured default grant on sign-in
//!
//! # Providers
//!
//! - [`SessionProvider`]: session lookup, sign in/up/out, metadata patches
//!   and a change-notification stream
//! - [`CreditAdmin`]: administrator-only credit injection
//! - [`MemorySessionProvider`]: an in-process implementation of both

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod memory;
pub mod provider;
pub mod session;

pub use error::{AuthError, Result};
pub use memory::MemorySessionProvider;
pub use provider::{ensure_credit_grant, CreditAdmin, SessionProvider};
pub use session::{CreditPolicy, MetadataPatch, Session, SessionEvent};
