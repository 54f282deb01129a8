use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::FedEvent;

/// The event the countdown points at, and whether it came from the configured fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownTarget {
    pub title: String,
    pub at: DateTime<Utc>,
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl CountdownTarget {
    pub fn fallback(title: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self { title: title.into(), at, is_fallback: true }
    }
}

/// Uses the scraped event when its timestamp parses and lies in the future,
/// otherwise keeps the fallback target (if any).
pub fn resolve_target(
    event: Option<&FedEvent>,
    fallback: Option<CountdownTarget>,
    now: DateTime<Utc>,
) -> Option<CountdownTarget> {
    let live = event.and_then(|e| {
        let at = DateTime::parse_from_rfc3339(&e.date_time_iso).ok()?.with_timezone(&Utc);
        (at > now).then(|| CountdownTarget { title: e.title.clone(), at, is_fallback: false })
    });

    live.or(fallback)
}

/// Whole days, hours, minutes and seconds until `target`; zero once it has passed.
pub fn remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let total = (target - now).num_seconds().max(0);
    TimeRemaining {
        days: total / 86_400,
        hours: total % 86_400 / 3_600,
        minutes: total % 3_600 / 60,
        seconds: total % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(iso: &str) -> FedEvent {
        FedEvent { title: "Speech - Chair Powell".into(), date_time_iso: iso.into(), source: "test".into() }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_remaining_breakdown() {
        let now = at(2025, 8, 20, 12, 0, 0);
        let left = remaining(at(2025, 8, 22, 14, 30, 15), now);
        assert_eq!(left, TimeRemaining { days: 2, hours: 2, minutes: 30, seconds: 15 });
    }

    #[test]
    fn test_remaining_clamps_at_zero() {
        let now = at(2025, 8, 23, 0, 0, 0);
        assert_eq!(remaining(at(2025, 8, 22, 14, 0, 0), now), TimeRemaining::default());
        assert_eq!(remaining(now, now), TimeRemaining::default());
    }

    #[test]
    fn test_future_event_is_used() {
        let now = at(2025, 8, 1, 0, 0, 0);
        let e = event("2025-08-22T10:00:00-04:00");
        let fallback = CountdownTarget::fallback("FOMC", at(2025, 9, 17, 18, 0, 0));
        let target = resolve_target(Some(&e), Some(fallback), now).unwrap();
        assert!(!target.is_fallback);
        assert_eq!(target.at, at(2025, 8, 22, 14, 0, 0));
        assert_eq!(target.title, "Speech - Chair Powell");
    }

    #[test]
    fn test_past_or_garbled_event_uses_fallback() {
        let now = at(2025, 9, 1, 0, 0, 0);
        let fallback = CountdownTarget::fallback("FOMC", at(2025, 9, 17, 18, 0, 0));

        let past = event("2025-08-22T10:00:00-04:00");
        assert!(resolve_target(Some(&past), Some(fallback.clone()), now).unwrap().is_fallback);

        let garbled = event("next Friday");
        let target = resolve_target(Some(&garbled), Some(fallback.clone()), now).unwrap();
        assert_eq!(target, fallback);

        assert!(resolve_target(None, Some(fallback), now).unwrap().is_fallback);
        assert!(resolve_target(Some(&past), None, now).is_none());
    }
}
