//! Completion state for recurring items.

use super::period::{count_in_period, period_bounds, period_count, Period};
use super::target::target_count;
use crate::model::backlog::BacklogItem;
use crate::model::progress::ProgressRecord;
use chrono::{DateTime, TimeZone};

/// Completion snapshot of one recurring item in its current period.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringStatus<Tz: TimeZone> {
    pub period: Period<Tz>,
    pub current_count: u32,
    pub target_count: u32,
    pub is_completed: bool,
    /// `current / target`, capped at 1.0.
    pub completion_rate: f64,
    /// `"current/target"`.
    pub progress_text: String,
    /// e.g. `本周已完成 ✓` or `本周未完成`.
    pub status_text: String,
}

/// Whether `item` reached its per-period target.
///
/// One-shot items are never completed by this rule.
pub fn is_completed<Tz: TimeZone>(
    item: &BacklogItem,
    records: &[ProgressRecord],
    now: &DateTime<Tz>,
) -> bool {
    item.is_recurring() && period_count(item, records, now) >= target_count(item)
}

/// Builds a status snapshot; `None` for one-shot items.
pub fn recurring_status<Tz: TimeZone>(
    item: &BacklogItem,
    records: &[ProgressRecord],
    now: &DateTime<Tz>,
) -> Option<RecurringStatus<Tz>> {
    let recurrence = item.recurrence?;
    let period = period_bounds(recurrence.kind, now);
    let current_count = count_in_period(item, records, &period);
    let target = target_count(item);
    let is_completed = current_count >= target;
    let label = recurrence.kind.period_label();

    Some(RecurringStatus {
        period,
        current_count,
        target_count: target,
        is_completed,
        completion_rate: (f64::from(current_count) / f64::from(target)).min(1.0),
        progress_text: format!("{current_count}/{target}"),
        status_text: if is_completed {
            format!("{label}已完成 ✓")
        } else {
            format!("{label}未完成")
        },
    })
}
