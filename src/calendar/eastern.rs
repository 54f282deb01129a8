//! US Eastern Time wall-clock to absolute instant, via the `America/New_York` zone.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::America::New_York;

/// Attaches the Eastern offset in force at a wall-clock time.
///
/// The repeated autumn hour resolves to its first (daylight) occurrence. A time
/// inside the spring-forward gap keeps its wall-clock reading and takes the
/// daylight offset that begins right after the gap.
pub fn from_eastern(local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match New_York.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
        LocalResult::None => {
            let after_gap = New_York.from_local_datetime(&(local + Duration::hours(1))).earliest()?;
            local.and_local_timezone(after_gap.offset().fix()).single()
        }
    }
}
