//! Intent resolution core for LazyPlan.
//!
//! Pure functions the agent actions rely on: time phrase normalization,
//! backlog item matching and recurring period tracking. The record store,
//! transport and model integration live outside this crate.

pub mod logging;
pub mod matching;
pub mod model;
pub mod recurrence;
pub mod temporal;

pub use logging::{default_log_level, init_logging, logging_status};
pub use matching::fuzzy::{
    best_match, match_items, resolve_item, tokenize_query, FuzzyMatcher, ItemResolution,
    MatchWeights, ScoredMatch,
};
pub use model::backlog::{
    parse_target_value, BacklogItem, BacklogItemId, RecurrenceDescriptor, RecurrenceType,
    RecurrenceTypeError,
};
pub use model::progress::{ProgressRecord, ProgressRecordId};
pub use model::ModelValidationError;
pub use recurrence::period::{period_bounds, period_count, Period};
pub use recurrence::status::{is_completed, recurring_status, RecurringStatus};
pub use recurrence::target::{infer_target_from_name, target_count};
pub use temporal::resolver::{
    resolve_time, resolve_time_detailed, ResolvedBy, TimeResolution, TimeResolver,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
