//! Recurring commitment tracking.
//!
//! # Responsibility
//! - Derive the active daily/weekly/monthly period from a reference instant.
//! - Count in-period progress and decide completion against the target.
//!
//! # Invariants
//! - No period state is stored; every call recomputes from `now`.
//! - Weeks are ISO weeks starting on Monday.

pub mod period;
pub mod status;
pub mod target;
