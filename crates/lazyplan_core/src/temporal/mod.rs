//! Temporal expression resolution.
//!
//! # Responsibility
//! - Turn absolute or colloquial time phrases into concrete instants.
//! - Share local wall-clock helpers with period computation.
//!
//! # Invariants
//! - Resolution never fails; unrecognized text resolves to the reference
//!   instant.
//! - "Local" always means the time zone carried by the reference instant.

pub(crate) mod local;
pub mod resolver;
