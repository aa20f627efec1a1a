//! Local wall-clock to instant conversion.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone};

/// Step used to probe past a DST gap. Real-world gaps end on a quarter hour.
const GAP_PROBE_STEP_MINUTES: i64 = 15;
/// 26 hours; the longest real gaps skip a whole calendar day.
const GAP_PROBE_MAX_STEPS: i64 = 26 * 4;

/// Maps a local wall-clock time in `tz` to an instant.
///
/// Folded times map to the earlier instant. Times inside a gap map to the
/// first valid local time after the gap.
pub(crate) fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(instant) = tz.from_local_datetime(&naive).earliest() {
        return instant;
    }

    for step in 1..=GAP_PROBE_MAX_STEPS {
        let probe = TimeDelta::try_minutes(step * GAP_PROBE_STEP_MINUTES)
            .and_then(|delta| naive.checked_add_signed(delta));
        if let Some(instant) = probe.and_then(|p| tz.from_local_datetime(&p).earliest()) {
            return instant;
        }
    }

    tz.from_utc_datetime(&naive)
}
