//! Progress record model.
//!
//! # Invariants
//! - `item_id` names exactly one owning backlog item and is never nil.
//! - `recorded_at` may precede "now"; backfilled records are valid.

use super::backlog::BacklogItemId;
use super::ModelValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for progress records.
pub type ProgressRecordId = Uuid;

/// Timestamped note of work done against one backlog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProgressRecordWire")]
pub struct ProgressRecord {
    pub id: ProgressRecordId,
    pub item_id: BacklogItemId,
    pub content: String,
    pub reflection: Option<String>,
    /// Absolute instant the work happened.
    pub recorded_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ProgressRecordWire {
    id: ProgressRecordId,
    item_id: BacklogItemId,
    #[serde(default)]
    content: String,
    #[serde(default)]
    reflection: Option<String>,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<ProgressRecordWire> for ProgressRecord {
    type Error = ModelValidationError;

    fn try_from(wire: ProgressRecordWire) -> Result<Self, Self::Error> {
        let record = Self {
            id: wire.id,
            item_id: wire.item_id,
            content: wire.content,
            reflection: wire.reflection,
            recorded_at: wire.recorded_at,
        };
        record.validate()?;
        Ok(record)
    }
}

impl ProgressRecord {
    /// Creates a record with a generated id.
    pub fn new(
        item_id: BacklogItemId,
        content: impl Into<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id,
            content: content.into(),
            reflection: None,
            recorded_at,
        }
    }

    pub fn with_reflection(mut self, reflection: impl Into<String>) -> Self {
        self.reflection = Some(reflection.into());
        self
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.item_id.is_nil() {
            return Err(ModelValidationError::NilOwnerId);
        }
        Ok(())
    }
}
