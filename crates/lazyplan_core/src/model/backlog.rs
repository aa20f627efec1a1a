//! Backlog item and recurrence descriptor model.
//!
//! # Responsibility
//! - Define the canonical backlog (goal/plan) shape consumed by matching and
//!   period tracking.
//! - Normalize raw recurrence settings coming from the record store.
//!
//! # Invariants
//! - `id` is non-nil and `name` is non-blank; decode enforces both.
//! - `recurrence` is `Some` only for recurring items.
//! - `target_count`, when present, is strictly positive.

use super::ModelValidationError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for backlog items.
pub type BacklogItemId = Uuid;

/// Repetition cadence of a recurring backlog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceType {
    /// Parses a stored recurrence kind (`daily|weekly|monthly`).
    ///
    /// Input is trimmed and compared case-insensitively.
    pub fn parse(value: &str) -> Result<Self, RecurrenceTypeError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(RecurrenceTypeError::Unsupported(other.to_string())),
        }
    }

    /// Stable wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// User-facing cadence label.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Daily => "每日",
            Self::Weekly => "每周",
            Self::Monthly => "每月",
        }
    }

    /// User-facing label for the current period of this cadence.
    pub fn period_label(self) -> &'static str {
        match self {
            Self::Daily => "今日",
            Self::Weekly => "本周",
            Self::Monthly => "本月",
        }
    }
}

/// Recurrence kind parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceTypeError {
    Unsupported(String),
}

impl Display for RecurrenceTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(value) => write!(
                f,
                "unsupported recurrence type `{value}`; expected daily|weekly|monthly"
            ),
        }
    }
}

impl Error for RecurrenceTypeError {}

/// Recurrence configuration attached to recurring backlog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceDescriptor {
    /// Serialized as `type` to match the record store schema.
    #[serde(rename = "type")]
    pub kind: RecurrenceType,
    /// Required completions per period. `None` falls back to the name
    /// heuristic in `recurrence::target`.
    pub target_count: Option<u32>,
}

impl RecurrenceDescriptor {
    pub fn new(kind: RecurrenceType, target_count: Option<u32>) -> Self {
        Self {
            kind,
            target_count: target_count.filter(|count| *count > 0),
        }
    }

    /// Builds a descriptor from raw stored strings.
    ///
    /// `value` keeps only its leading integer; `null`, blank, zero and
    /// unparsable values all mean "no explicit target".
    pub fn from_raw(kind: &str, value: Option<&str>) -> Result<Self, RecurrenceTypeError> {
        let kind = RecurrenceType::parse(kind)?;
        Ok(Self::new(kind, value.and_then(parse_target_value)))
    }
}

/// Parses a stored target count using leading-integer semantics.
pub fn parse_target_value(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return None;
    }

    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_len = unsigned
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(unsigned.len(), |(idx, _)| idx);
    if digits_len == 0 {
        return None;
    }

    unsigned[..digits_len]
        .parse::<u32>()
        .ok()
        .filter(|count| *count > 0)
}

/// Trackable goal/plan record supplied by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BacklogItemWire")]
pub struct BacklogItem {
    pub id: BacklogItemId,
    pub name: String,
    pub description: Option<String>,
    /// Stored as given; matching lowercases on the fly.
    pub tags: Vec<String>,
    pub recurrence: Option<RecurrenceDescriptor>,
}

#[derive(Deserialize)]
struct BacklogItemWire {
    id: BacklogItemId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    recurrence: Option<RecurrenceDescriptor>,
}

impl TryFrom<BacklogItemWire> for BacklogItem {
    type Error = ModelValidationError;

    fn try_from(wire: BacklogItemWire) -> Result<Self, Self::Error> {
        let item = Self {
            id: wire.id,
            name: wire.name,
            description: wire.description,
            tags: wire.tags,
            recurrence: wire.recurrence.map(|r| RecurrenceDescriptor::new(r.kind, r.target_count)),
        };
        item.validate()?;
        Ok(item)
    }
}

impl BacklogItem {
    /// Creates a one-shot item with a generated id.
    ///
    /// Does not validate `name`; call [`BacklogItem::validate`] before
    /// handing user input further.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            tags: Vec::new(),
            recurrence: None,
        }
    }

    /// Creates an item with a caller-provided id.
    pub fn with_id(id: BacklogItemId, name: impl Into<String>) -> Result<Self, ModelValidationError> {
        let item = Self {
            id,
            ..Self::new(name)
        };
        item.validate()?;
        Ok(item)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recurrence(mut self, kind: RecurrenceType, target_count: Option<u32>) -> Self {
        self.recurrence = Some(RecurrenceDescriptor::new(kind, target_count));
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.is_nil() {
            return Err(ModelValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ModelValidationError::BlankName);
        }
        Ok(())
    }
}
