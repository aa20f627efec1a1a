//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose intent resolution helpers to Dart via FRB.
//! - Convert string ids and epoch milliseconds into core model values.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All instants cross the boundary as UTC epoch milliseconds; local
//!   calendar rules use the host time zone.
//! - Invalid inputs degrade to `ok=false` envelopes or are skipped.

use chrono::{DateTime, Local};
use lazyplan_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    match_items, ping as ping_inner, recurring_status as recurring_status_inner,
    resolve_time_detailed, target_count, BacklogItem, ProgressRecord, RecurrenceDescriptor,
};
use log::warn;
use uuid::Uuid;

const MATCH_DEFAULT_LIMIT: u32 = 10;
const MATCH_LIMIT_MAX: u32 = 50;
const LOG_LEVEL_ENV: &str = "LAZYPLAN_LOG_LEVEL";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
///   Empty falls back to `LAZYPLAN_LOG_LEVEL`, then the build default.
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = effective_log_level(&level);
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Backlog item as supplied by the Dart-side record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiBacklogItem {
    /// Stable item ID in UUID string form.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// `daily|weekly|monthly`; `None` or empty for one-shot items.
    pub recurrence_type: Option<String>,
    /// Raw stored target value (e.g. `"3"`, `"null"`).
    pub target_count: Option<String>,
}

/// Progress record as supplied by the Dart-side record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiProgressRecord {
    pub id: String,
    pub item_id: String,
    pub content: String,
    pub recorded_at_epoch_ms: i64,
}

/// Time phrase resolution envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeResolveResponse {
    /// Whether `now_epoch_ms` was usable.
    pub ok: bool,
    /// Resolved instant; echoes `now_epoch_ms` when `ok=false`.
    pub epoch_ms: i64,
    /// `absolute|relative_day|relative_offset|fallback`.
    pub rule: String,
    pub message: String,
}

/// One ranked backlog match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchItem {
    pub item_id: String,
    pub name: String,
    pub score: u32,
}

/// Backlog match response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResponse {
    /// Ranked matches, best first.
    pub items: Vec<MatchItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
    /// Effective applied result limit.
    pub applied_limit: u32,
}

/// Recurring item status envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringStatusResponse {
    /// Whether inputs were valid.
    pub ok: bool,
    /// `false` for one-shot items; counters are zeroed then.
    pub recurring: bool,
    pub current_count: u32,
    pub target_count: u32,
    pub is_completed: bool,
    pub completion_rate: f64,
    pub progress_text: String,
    pub status_text: String,
    pub period_start_epoch_ms: Option<i64>,
    pub period_end_epoch_ms: Option<i64>,
    pub message: String,
}

impl RecurringStatusResponse {
    fn one_shot(target: u32) -> Self {
        Self {
            ok: true,
            recurring: false,
            current_count: 0,
            target_count: target,
            is_completed: false,
            completion_rate: 0.0,
            progress_text: String::new(),
            status_text: String::new(),
            period_start_epoch_ms: None,
            period_end_epoch_ms: None,
            message: "Item is not recurring.".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            ..Self::one_shot(0)
        }
    }
}

/// Normalizes a free-text time phrase into an epoch instant.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics; unknown phrases resolve to `now_epoch_ms` with rule `fallback`.
#[flutter_rust_bridge::frb(sync)]
pub fn resolve_time(text: String, now_epoch_ms: i64) -> TimeResolveResponse {
    let Some(now) = local_from_epoch_ms(now_epoch_ms) else {
        return TimeResolveResponse {
            ok: false,
            epoch_ms: now_epoch_ms,
            rule: "fallback".to_string(),
            message: format!("resolve_time failed: now_epoch_ms out of range: {now_epoch_ms}"),
        };
    };

    let resolved = resolve_time_detailed(&text, &now);
    TimeResolveResponse {
        ok: true,
        epoch_ms: resolved.instant.timestamp_millis(),
        rule: resolved.rule.as_str().to_string(),
        message: String::new(),
    }
}

/// Ranks backlog candidates against a free-text query.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Candidates with invalid ids or recurrence settings are skipped.
/// - Never panics.
/// - Returns deterministic envelope with applied limit.
#[flutter_rust_bridge::frb(sync)]
pub fn match_backlog(
    query: String,
    candidates: Vec<FfiBacklogItem>,
    limit: Option<u32>,
) -> MatchResponse {
    let normalized_limit = normalize_match_limit(limit);
    let total = candidates.len();
    let items = candidates
        .into_iter()
        .filter_map(|candidate| to_core_item(candidate).ok())
        .collect::<Vec<_>>();
    let skipped = total - items.len();
    if skipped > 0 {
        warn!("event=backlog_match module=ffi status=degraded skipped_candidates={skipped}");
    }

    let matches = match_items(&query, &items)
        .into_iter()
        .take(normalized_limit as usize)
        .map(|scored| MatchItem {
            item_id: scored.item.id.to_string(),
            name: scored.item.name.clone(),
            score: scored.score,
        })
        .collect::<Vec<_>>();

    let message = if matches.is_empty() {
        "No matching items.".to_string()
    } else {
        format!("Found {} matching item(s).", matches.len())
    };
    MatchResponse {
        items: matches,
        message,
        applied_limit: normalized_limit,
    }
}

/// Computes period progress for one backlog item.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Records with invalid ids or timestamps are skipped.
/// - Never panics; invalid item or `now` returns `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn recurring_status(
    item: FfiBacklogItem,
    records: Vec<FfiProgressRecord>,
    now_epoch_ms: i64,
) -> RecurringStatusResponse {
    let item = match to_core_item(item) {
        Ok(item) => item,
        Err(err) => return RecurringStatusResponse::failure(format!("recurring_status failed: {err}")),
    };
    let Some(now) = local_from_epoch_ms(now_epoch_ms) else {
        return RecurringStatusResponse::failure(format!(
            "recurring_status failed: now_epoch_ms out of range: {now_epoch_ms}"
        ));
    };

    let records = records
        .into_iter()
        .filter_map(to_core_record)
        .collect::<Vec<_>>();

    match recurring_status_inner(&item, &records, &now) {
        Some(status) => RecurringStatusResponse {
            ok: true,
            recurring: true,
            current_count: status.current_count,
            target_count: status.target_count,
            is_completed: status.is_completed,
            completion_rate: status.completion_rate,
            progress_text: status.progress_text,
            status_text: status.status_text,
            period_start_epoch_ms: Some(status.period.start.timestamp_millis()),
            period_end_epoch_ms: Some(status.period.end.timestamp_millis()),
            message: String::new(),
        },
        None => RecurringStatusResponse::one_shot(target_count(&item)),
    }
}

fn normalize_match_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) => MATCH_DEFAULT_LIMIT,
        Some(value) if value > MATCH_LIMIT_MAX => MATCH_LIMIT_MAX,
        Some(value) => value,
        None => MATCH_DEFAULT_LIMIT,
    }
}

fn effective_log_level(level: &str) -> String {
    if !level.trim().is_empty() {
        return level.to_string();
    }
    if let Ok(raw) = std::env::var(LOG_LEVEL_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    default_log_level().to_string()
}

fn local_from_epoch_ms(epoch_ms: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(epoch_ms).map(|utc| utc.with_timezone(&Local))
}

fn to_core_item(item: FfiBacklogItem) -> Result<BacklogItem, String> {
    let id = Uuid::parse_str(item.id.trim()).map_err(|err| format!("invalid item id: {err}"))?;
    let mut core = BacklogItem::with_id(id, item.name)
        .map_err(|err| err.to_string())?
        .with_tags(item.tags);
    core.description = item.description;

    if let Some(kind) = item
        .recurrence_type
        .as_deref()
        .filter(|kind| !kind.trim().is_empty())
    {
        let descriptor = RecurrenceDescriptor::from_raw(kind, item.target_count.as_deref())
            .map_err(|err| err.to_string())?;
        core.recurrence = Some(descriptor);
    }
    Ok(core)
}

fn to_core_record(record: FfiProgressRecord) -> Option<ProgressRecord> {
    let id = Uuid::parse_str(record.id.trim()).ok()?;
    let item_id = Uuid::parse_str(record.item_id.trim()).ok()?;
    let recorded_at = DateTime::from_timestamp_millis(record.recorded_at_epoch_ms)?;
    let mut core = ProgressRecord::new(item_id, record.content, recorded_at);
    core.id = id;
    core.validate().ok()?;
    Some(core)
}
