//! Period bounds and in-period counting.
//!
//! # Invariants
//! - Periods are half-open `[start, end)` and derived only from `(kind, now)`.
//! - Two `now` values in the same local day/ISO week/month yield equal bounds.

use crate::model::backlog::{BacklogItem, RecurrenceType};
use crate::model::progress::ProgressRecord;
use crate::temporal::local::localize;
use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

/// Active period for a recurrence cadence.
#[derive(Debug, Clone, PartialEq)]
pub struct Period<Tz: TimeZone> {
    pub kind: RecurrenceType,
    /// Inclusive.
    pub start: DateTime<Tz>,
    /// Exclusive.
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> Period<Tz> {
    /// Whether `instant` falls inside `[start, end)`.
    pub fn contains<Other: TimeZone>(&self, instant: &DateTime<Other>) -> bool {
        let instant = instant.naive_utc();
        self.start.naive_utc() <= instant && instant < self.end.naive_utc()
    }
}

/// Computes the period of `kind` that contains `now`, in `now`'s time zone.
pub fn period_bounds<Tz: TimeZone>(kind: RecurrenceType, now: &DateTime<Tz>) -> Period<Tz> {
    let today = now.date_naive();
    let (start_day, end_day) = match kind {
        RecurrenceType::Daily => (today, next_day(today)),
        RecurrenceType::Weekly => {
            let monday = today
                .checked_sub_signed(days(i64::from(today.weekday().num_days_from_monday())))
                .unwrap_or(today);
            let next_monday = monday.checked_add_signed(days(7)).unwrap_or(monday);
            (monday, next_monday)
        }
        RecurrenceType::Monthly => {
            let first = today.with_day(1).unwrap_or(today);
            let next_first = first.checked_add_months(Months::new(1)).unwrap_or(first);
            (first, next_first)
        }
    };

    let tz = now.timezone();
    Period {
        kind,
        start: localize(&tz, start_day.and_time(NaiveTime::MIN)),
        end: localize(&tz, end_day.and_time(NaiveTime::MIN)),
    }
}

/// Counts `item`'s records inside its current period.
///
/// Records owned by other items are ignored. One-shot items count zero.
pub fn period_count<Tz: TimeZone>(
    item: &BacklogItem,
    records: &[ProgressRecord],
    now: &DateTime<Tz>,
) -> u32 {
    let Some(recurrence) = item.recurrence else {
        return 0;
    };
    let period = period_bounds(recurrence.kind, now);
    count_in_period(item, records, &period)
}

pub(crate) fn count_in_period<Tz: TimeZone>(
    item: &BacklogItem,
    records: &[ProgressRecord],
    period: &Period<Tz>,
) -> u32 {
    let count = records
        .iter()
        .filter(|record| record.item_id == item.id)
        .filter(|record| period.contains::<Utc>(&record.recorded_at))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn next_day(day: NaiveDate) -> NaiveDate {
    day.succ_opt().unwrap_or(day)
}

fn days(count: i64) -> TimeDelta {
    TimeDelta::try_days(count).unwrap_or(TimeDelta::zero())
}
