//! Per-period target count resolution.
//!
//! An explicit positive `target_count` always wins. The name heuristic below
//! is a best-effort fallback for items created without one; callers should
//! prefer storing explicit targets.

use crate::model::backlog::BacklogItem;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const DEFAULT_TARGET_COUNT: u32 = 1;

struct CountRule {
    pattern: Regex,
    extract: fn(&Captures<'_>) -> Option<u32>,
}

/// Name heuristics in priority order; the first rule yielding a count wins.
static COUNT_RULES: Lazy<Vec<CountRule>> = Lazy::new(|| {
    vec![
        // "2-3次" counts as the upper bound.
        CountRule {
            pattern: Regex::new(r"([0-9]+)\s*[-–~～到至]\s*([0-9]+)\s*次")
                .expect("valid count range regex"),
            extract: |caps| positive_number(caps, 2),
        },
        CountRule {
            pattern: Regex::new(r"([0-9]+)\s*次").expect("valid numeric count regex"),
            extract: |caps| positive_number(caps, 1),
        },
        CountRule {
            pattern: Regex::new(r"([一二两三四五六七八九十]+)次").expect("valid numeral count regex"),
            extract: |caps| caps.get(1).and_then(|m| chinese_numeral(m.as_str())),
        },
    ]
});

/// Required completions per period for `item`.
///
/// One-shot items and names without a recognizable count resolve to 1.
pub fn target_count(item: &BacklogItem) -> u32 {
    let Some(recurrence) = item.recurrence else {
        return DEFAULT_TARGET_COUNT;
    };
    if let Some(explicit) = recurrence.target_count.filter(|count| *count > 0) {
        return explicit;
    }
    infer_target_from_name(&item.name).unwrap_or(DEFAULT_TARGET_COUNT)
}

/// Applies the name heuristic table; `None` when no rule matches.
pub fn infer_target_from_name(name: &str) -> Option<u32> {
    COUNT_RULES.iter().find_map(|rule| {
        rule.pattern
            .captures_iter(name)
            .find_map(|caps| (rule.extract)(&caps))
    })
}

fn positive_number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?
        .as_str()
        .parse::<u32>()
        .ok()
        .filter(|count| *count > 0)
}

/// Parses numerals up to 九十九 (`三`, `十二`, `二十`, `二十三`).
fn chinese_numeral(value: &str) -> Option<u32> {
    let chars = value.chars().collect::<Vec<_>>();
    match chars.as_slice() {
        ['十'] => Some(10),
        [ones] => chinese_digit(*ones),
        ['十', ones] => Some(10 + chinese_digit(*ones)?),
        [tens, '十'] => Some(chinese_digit(*tens)? * 10),
        [tens, '十', ones] => Some(chinese_digit(*tens)? * 10 + chinese_digit(*ones)?),
        _ => None,
    }
}

fn chinese_digit(ch: char) -> Option<u32> {
    let digit = match ch {
        '一' => 1,
        '二' | '两' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        _ => return None,
    };
    Some(digit)
}
