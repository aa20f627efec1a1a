use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use chrono_tz::America::{New_York, Santiago};
use lazyplan_core::{
    is_completed, period_bounds, period_count, recurring_status, target_count, BacklogItem,
    ProgressRecord, RecurrenceType,
};

fn cst(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(8 * 3600)
        .unwrap()
        .with_ymd_and_hms(y, mo, d, h, mi, s)
        .unwrap()
}

fn record_at(item: &BacklogItem, at: DateTime<FixedOffset>) -> ProgressRecord {
    ProgressRecord::new(item.id, "done", at.with_timezone(&Utc))
}

#[test]
fn weekly_target_completes_on_third_record() {
    let item = BacklogItem::new("拳击训练").with_recurrence(RecurrenceType::Weekly, Some(3));
    // 2025-01-08 is a Wednesday.
    let now = cst(2025, 1, 8, 12, 0, 0);
    let mut records = vec![
        record_at(&item, cst(2025, 1, 6, 10, 0, 0)),
        record_at(&item, cst(2025, 1, 7, 20, 0, 0)),
    ];

    assert_eq!(period_count(&item, &records, &now), 2);
    assert_eq!(target_count(&item), 3);
    assert!(!is_completed(&item, &records, &now));

    records.push(record_at(&item, cst(2025, 1, 8, 9, 0, 0)));
    assert_eq!(period_count(&item, &records, &now), 3);
    assert!(is_completed(&item, &records, &now));
}

#[test]
fn name_range_sets_target_to_upper_bound() {
    let item = BacklogItem::new("每周拳击2-3次").with_recurrence(RecurrenceType::Weekly, None);
    assert_eq!(target_count(&item), 3);
}

#[test]
fn explicit_target_wins_over_name() {
    let item = BacklogItem::new("每周拳击2-3次").with_recurrence(RecurrenceType::Weekly, Some(5));
    assert_eq!(target_count(&item), 5);

    let zero = BacklogItem::new("每周拳击2-3次").with_recurrence(RecurrenceType::Weekly, Some(0));
    assert_eq!(target_count(&zero), 3);
}

#[test]
fn unrecognized_name_defaults_to_one() {
    let item = BacklogItem::new("每日冥想").with_recurrence(RecurrenceType::Daily, None);
    assert_eq!(target_count(&item), 1);
}

#[test]
fn same_period_instants_share_bounds() {
    let pairs = [
        (
            RecurrenceType::Daily,
            cst(2025, 1, 8, 0, 0, 0),
            cst(2025, 1, 8, 23, 59, 59),
        ),
        (
            RecurrenceType::Weekly,
            cst(2025, 1, 6, 0, 0, 0),
            cst(2025, 1, 12, 23, 59, 59),
        ),
        (
            RecurrenceType::Monthly,
            cst(2024, 2, 1, 0, 0, 0),
            cst(2024, 2, 29, 23, 59, 59),
        ),
    ];

    for (kind, first, second) in pairs {
        assert_eq!(
            period_bounds(kind, &first),
            period_bounds(kind, &second),
            "{kind:?}"
        );
    }
}

#[test]
fn period_bounds_follow_local_calendar() {
    let now = cst(2025, 1, 8, 12, 0, 0);

    let daily = period_bounds(RecurrenceType::Daily, &now);
    assert_eq!(daily.start, cst(2025, 1, 8, 0, 0, 0));
    assert_eq!(daily.end, cst(2025, 1, 9, 0, 0, 0));

    let weekly = period_bounds(RecurrenceType::Weekly, &now);
    assert_eq!(weekly.start, cst(2025, 1, 6, 0, 0, 0));
    assert_eq!(weekly.end, cst(2025, 1, 13, 0, 0, 0));

    let monthly = period_bounds(RecurrenceType::Monthly, &now);
    assert_eq!(monthly.start, cst(2025, 1, 1, 0, 0, 0));
    assert_eq!(monthly.end, cst(2025, 2, 1, 0, 0, 0));
}

#[test]
fn one_shot_item_counts_zero_and_never_completes() {
    let item = BacklogItem::new("写周报");
    let now = cst(2025, 1, 8, 12, 0, 0);
    let records = vec![record_at(&item, cst(2025, 1, 8, 9, 0, 0))];

    assert_eq!(period_count(&item, &records, &now), 0);
    assert_eq!(target_count(&item), 1);
    assert!(!is_completed(&item, &records, &now));
    assert!(recurring_status(&item, &records, &now).is_none());
}

#[test]
fn records_of_other_items_are_ignored() {
    let item = BacklogItem::new("拳击训练").with_recurrence(RecurrenceType::Daily, Some(1));
    let other = BacklogItem::new("读书").with_recurrence(RecurrenceType::Daily, Some(1));
    let now = cst(2025, 1, 8, 12, 0, 0);
    let records = vec![record_at(&other, cst(2025, 1, 8, 9, 0, 0))];

    assert_eq!(period_count(&item, &records, &now), 0);
    assert!(!is_completed(&item, &records, &now));
    assert!(is_completed(&other, &records, &now));
}

#[test]
fn previous_period_records_do_not_count() {
    let item = BacklogItem::new("拳击训练").with_recurrence(RecurrenceType::Weekly, Some(1));
    let now = cst(2025, 1, 8, 12, 0, 0);
    // Sunday of the previous ISO week.
    let records = vec![record_at(&item, cst(2025, 1, 5, 23, 59, 59))];

    assert_eq!(period_count(&item, &records, &now), 0);
}

#[test]
fn backfilled_record_inside_period_counts() {
    let item = BacklogItem::new("读书").with_recurrence(RecurrenceType::Monthly, Some(2));
    let now = cst(2025, 1, 20, 8, 0, 0);
    let records = vec![
        record_at(&item, cst(2025, 1, 2, 21, 0, 0)),
        record_at(&item, cst(2025, 1, 19, 22, 0, 0)),
    ];

    assert!(is_completed(&item, &records, &now));
}

#[test]
fn period_start_is_inclusive_and_end_exclusive() {
    let item = BacklogItem::new("喝水").with_recurrence(RecurrenceType::Daily, Some(5));
    let now = cst(2025, 1, 8, 12, 0, 0);
    let records = vec![
        record_at(&item, cst(2025, 1, 8, 0, 0, 0)),
        record_at(&item, cst(2025, 1, 9, 0, 0, 0)),
        record_at(&item, cst(2025, 1, 8, 0, 0, 0) - TimeDelta::seconds(1)),
    ];

    assert_eq!(period_count(&item, &records, &now), 1);
}

#[test]
fn local_midnight_not_utc_midnight_splits_days() {
    let item = BacklogItem::new("喝水").with_recurrence(RecurrenceType::Daily, Some(1));
    let now = cst(2025, 1, 8, 9, 0, 0);
    // 2025-01-08 01:00 +08:00 is still 2025-01-07 in UTC.
    let records = vec![ProgressRecord::new(
        item.id,
        "早起喝水",
        Utc.with_ymd_and_hms(2025, 1, 7, 17, 0, 0).unwrap(),
    )];

    assert_eq!(period_count(&item, &records, &now), 1);
    assert_eq!(period_count(&item, &records, &now.with_timezone(&Utc)), 0);
}

#[test]
fn adding_in_period_record_never_uncompletes() {
    let item = BacklogItem::new("每周跑步2次").with_recurrence(RecurrenceType::Weekly, None);
    let now = cst(2025, 1, 8, 12, 0, 0);
    let mut records = Vec::new();
    let mut was_completed = false;

    for day in 6..=8 {
        records.push(record_at(&item, cst(2025, 1, day, 7, 0, 0)));
        let completed = is_completed(&item, &records, &now);
        assert!(completed || !was_completed);
        was_completed = completed;
    }
    assert!(was_completed);
}

#[test]
fn status_reports_period_label_and_progress() {
    let item = BacklogItem::new("每月复盘").with_recurrence(RecurrenceType::Monthly, Some(2));
    let now = cst(2025, 1, 20, 8, 0, 0);
    let records = vec![record_at(&item, cst(2025, 1, 3, 21, 0, 0))];

    let status = recurring_status(&item, &records, &now).expect("recurring item has status");
    assert_eq!(status.period.start, cst(2025, 1, 1, 0, 0, 0));
    assert_eq!(status.current_count, 1);
    assert_eq!(status.target_count, 2);
    assert!(!status.is_completed);
    assert_eq!(status.completion_rate, 0.5);
    assert_eq!(status.progress_text, "1/2");
    assert_eq!(status.status_text, "本月未完成");
}

#[test]
fn daily_period_starts_after_gap_when_midnight_is_skipped() {
    // Santiago jumps from 00:00 to 01:00 on 2024-09-08.
    let item = BacklogItem::new("喝水").with_recurrence(RecurrenceType::Daily, Some(1));
    let now = Santiago.with_ymd_and_hms(2024, 9, 8, 12, 0, 0).unwrap();
    let period = period_bounds(RecurrenceType::Daily, &now);

    assert_eq!(period.start, Santiago.with_ymd_and_hms(2024, 9, 8, 1, 0, 0).unwrap());
    assert_eq!(period.end, Santiago.with_ymd_and_hms(2024, 9, 9, 0, 0, 0).unwrap());
    assert_eq!(period.end.clone() - period.start.clone(), TimeDelta::hours(23));

    let records = vec![
        // 2024-09-07 23:59:59 -04:00, the previous local day.
        ProgressRecord::new(
            item.id,
            "late",
            Utc.with_ymd_and_hms(2024, 9, 8, 3, 59, 59).unwrap(),
        ),
        // 01:00 -03:00, the first instant of the day.
        ProgressRecord::new(
            item.id,
            "early",
            Utc.with_ymd_and_hms(2024, 9, 8, 4, 0, 0).unwrap(),
        ),
    ];
    assert_eq!(period_count(&item, &records, &now), 1);
}

#[test]
fn weekly_period_spanning_spring_forward_is_one_hour_short() {
    let now = New_York.with_ymd_and_hms(2025, 3, 12, 12, 0, 0).unwrap();
    let period = period_bounds(RecurrenceType::Weekly, &now);

    assert_eq!(period.start, New_York.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
    assert_eq!(period.end.clone() - period.start.clone(), TimeDelta::hours(7 * 24));

    let spanning = period_bounds(
        RecurrenceType::Weekly,
        &New_York.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap(),
    );
    assert_eq!(spanning.start, New_York.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap());
    assert_eq!(spanning.end, period.start);
    assert_eq!(spanning.end - spanning.start, TimeDelta::hours(7 * 24 - 1));
}
