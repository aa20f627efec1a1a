//! Value model for backlog items and progress records.
//!
//! # Responsibility
//! - Define the shapes handed to core by the external record store.
//! - Validate identity and naming invariants on construction and decode.
//!
//! # Invariants
//! - Every item and record is identified by a non-nil `Uuid`.
//! - A progress record always has exactly one owning backlog item.
//! - Core never retains model values between calls.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod backlog;
pub mod progress;

/// Validation failures for model values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Entity identifier is the nil UUID.
    NilId,
    /// Progress record owner identifier is the nil UUID.
    NilOwnerId,
    /// Backlog item name is empty after trim.
    BlankName,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil uuid"),
            Self::NilOwnerId => write!(f, "item_id must not be nil uuid"),
            Self::BlankName => write!(f, "name must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}
