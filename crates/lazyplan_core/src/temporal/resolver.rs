//! Rule-table driven time phrase resolver.
//!
//! # Responsibility
//! - Resolve explicit timestamps, relative-day phrases with optional clock
//!   time, and "N units ago" offsets against a reference instant.
//!
//! # Invariants
//! - Rules are tried in fixed priority order; the first match wins.
//! - Only the first clock mention in a phrase is used.
//! - Anything unrecognized resolves to `now` with `ResolvedBy::Fallback`.

use super::local::localize;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

const NAIVE_ABSOLUTE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_PAST_DAY_ANCHOR_HOUR: u32 = 20;
const AFTERNOON_SHIFT_MAX_HOUR: i64 = 12;

/// The hour must not continue a longer digit run (`123点` is not 23:00).
static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{1,2})[点:：](半|[0-9]{1,2})?").expect("valid clock regex")
});

static OFFSET_RULES: Lazy<Vec<OffsetRule>> = Lazy::new(|| {
    vec![
        OffsetRule {
            pattern: Regex::new(r"([0-9]+)\s*个?\s*小时前").expect("valid hours-ago regex"),
            unit: OffsetUnit::Hours,
        },
        OffsetRule {
            pattern: Regex::new(r"([0-9]+)\s*分钟前").expect("valid minutes-ago regex"),
            unit: OffsetUnit::Minutes,
        },
        OffsetRule {
            pattern: Regex::new(r"([0-9]+)\s*天前").expect("valid days-ago regex"),
            unit: OffsetUnit::Days,
        },
    ]
});

/// Relative-day rows, in priority order.
const DAY_RULES: &[DayRule] = &[
    DayRule {
        keywords: &["昨天", "昨晚"],
        day_offset: -1,
        afternoon_markers: &["晚", "夜"],
        default_time: DefaultTime::PastDayAnchor,
    },
    DayRule {
        keywords: &["今天", "今晚"],
        day_offset: 0,
        afternoon_markers: &["下午", "晚", "夜"],
        default_time: DefaultTime::CurrentTimeOfDay,
    },
    DayRule {
        keywords: &["前天", "前晚"],
        day_offset: -2,
        afternoon_markers: &["晚", "夜"],
        default_time: DefaultTime::PastDayAnchor,
    },
];

/// Which rule produced a resolved instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    /// Explicit timestamp text.
    Absolute,
    /// 昨天/今天/前天 family, with or without clock time.
    RelativeDay,
    /// "N 小时前" style offsets.
    RelativeOffset,
    /// Nothing recognized; the reference instant was returned.
    Fallback,
}

impl ResolvedBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::RelativeDay => "relative_day",
            Self::RelativeOffset => "relative_offset",
            Self::Fallback => "fallback",
        }
    }
}

/// Resolved instant plus the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeResolution<Tz: TimeZone> {
    pub instant: DateTime<Tz>,
    pub rule: ResolvedBy,
}

#[derive(Debug, Clone, Copy)]
enum DefaultTime {
    PastDayAnchor,
    /// `now`'s wall-clock time, truncated to the minute.
    CurrentTimeOfDay,
}

#[derive(Debug)]
struct DayRule {
    keywords: &'static [&'static str],
    day_offset: i64,
    /// Markers that move an hour <= 12 into the afternoon.
    afternoon_markers: &'static [&'static str],
    default_time: DefaultTime,
}

#[derive(Debug, Clone, Copy)]
enum OffsetUnit {
    Hours,
    Minutes,
    Days,
}

impl OffsetUnit {
    fn delta(self, amount: i64) -> Option<TimeDelta> {
        match self {
            Self::Hours => TimeDelta::try_hours(amount),
            Self::Minutes => TimeDelta::try_minutes(amount),
            Self::Days => TimeDelta::try_days(amount),
        }
    }
}

#[derive(Debug)]
struct OffsetRule {
    pattern: Regex,
    unit: OffsetUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClockMention {
    hour: i64,
    minute: i64,
}

/// Time phrase resolver with configurable defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeResolver {
    past_day_anchor: NaiveTime,
}

impl Default for TimeResolver {
    fn default() -> Self {
        Self {
            past_day_anchor: NaiveTime::from_hms_opt(DEFAULT_PAST_DAY_ANCHOR_HOUR, 0, 0)
                .unwrap_or(NaiveTime::MIN),
        }
    }
}

impl TimeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the time used for 昨天/前天 phrases without a clock time.
    pub fn with_past_day_anchor(mut self, anchor: NaiveTime) -> Self {
        self.past_day_anchor = anchor;
        self
    }

    pub fn past_day_anchor(&self) -> NaiveTime {
        self.past_day_anchor
    }

    /// Resolves `text` against `now` and reports the rule that matched.
    pub fn resolve<Tz: TimeZone>(&self, text: &str, now: &DateTime<Tz>) -> TimeResolution<Tz> {
        let trimmed = text.trim();
        let resolution = if let Some(instant) = resolve_absolute(trimmed, now) {
            TimeResolution {
                instant,
                rule: ResolvedBy::Absolute,
            }
        } else if let Some(instant) = self.resolve_relative_day(trimmed, now) {
            TimeResolution {
                instant,
                rule: ResolvedBy::RelativeDay,
            }
        } else if let Some(instant) = resolve_relative_offset(trimmed, now) {
            TimeResolution {
                instant,
                rule: ResolvedBy::RelativeOffset,
            }
        } else {
            TimeResolution {
                instant: now.clone(),
                rule: ResolvedBy::Fallback,
            }
        };

        debug!(
            "event=time_resolve module=temporal status=ok rule={} input_chars={}",
            resolution.rule.as_str(),
            trimmed.chars().count()
        );
        resolution
    }

    fn resolve_relative_day<Tz: TimeZone>(
        &self,
        text: &str,
        now: &DateTime<Tz>,
    ) -> Option<DateTime<Tz>> {
        let rule = DAY_RULES
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| text.contains(keyword)))?;
        let day = now
            .date_naive()
            .checked_add_signed(TimeDelta::try_days(rule.day_offset)?)?;

        let local = match extract_clock(text) {
            Some(clock) => {
                let afternoon = rule
                    .afternoon_markers
                    .iter()
                    .any(|marker| text.contains(marker));
                let hour = if afternoon && clock.hour <= AFTERNOON_SHIFT_MAX_HOUR {
                    clock.hour + 12
                } else {
                    clock.hour
                };
                // Duration arithmetic lets 晚上12点 roll into the next midnight.
                let offset = TimeDelta::try_hours(hour)?
                    .checked_add(&TimeDelta::try_minutes(clock.minute)?)?;
                day.and_time(NaiveTime::MIN).checked_add_signed(offset)?
            }
            None => match rule.default_time {
                DefaultTime::PastDayAnchor => day.and_time(self.past_day_anchor),
                DefaultTime::CurrentTimeOfDay => {
                    let time = now.time();
                    day.and_hms_opt(time.hour(), time.minute(), 0)?
                }
            },
        };

        Some(localize(&now.timezone(), local))
    }
}

/// Resolves `text` against `now` with default settings.
///
/// Never fails: unrecognized text returns `now` unchanged.
pub fn resolve_time<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> DateTime<Tz> {
    resolve_time_detailed(text, now).instant
}

/// Same as [`resolve_time`] but also reports which rule matched.
pub fn resolve_time_detailed<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> TimeResolution<Tz> {
    TimeResolver::default().resolve(text, now)
}

fn resolve_absolute<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    if text.is_empty() {
        return None;
    }

    let tz = now.timezone();
    for format in NAIVE_ABSOLUTE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(localize(&tz, naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_ONLY_FORMAT) {
        return Some(localize(&tz, date.and_time(NaiveTime::MIN)));
    }

    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|instant| instant.with_timezone(&tz))
}

fn resolve_relative_offset<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    for rule in OFFSET_RULES.iter() {
        let Some(caps) = rule.pattern.captures(text) else {
            continue;
        };
        // An unusable count means this rule does not apply; later rules still get a turn.
        let resolved = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .and_then(|amount| rule.unit.delta(amount))
            .and_then(|delta| now.clone().checked_sub_signed(delta));
        if resolved.is_some() {
            return resolved;
        }
    }
    None
}

fn extract_clock(text: &str) -> Option<ClockMention> {
    let caps = CLOCK_RE.captures(text)?;
    let hour = caps.get(1)?.as_str().parse::<i64>().ok()?;
    let minute = match caps.get(2).map(|m| m.as_str()) {
        Some("半") => 30,
        Some(digits) => digits.parse::<i64>().ok()?,
        None => 0,
    };
    Some(ClockMention { hour, minute })
}
