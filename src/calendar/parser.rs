use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::Html;

use super::eastern::from_eastern;
use crate::models::FedEvent;

/// Lines scanned on each side of a matching line for its date.
pub const WINDOW_RADIUS: usize = 5;

/// "Friday, August 22, 2025 10:00 a.m. ET", weekday optional, am/pm with or without dots.
static DATE_TIME_ET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday),?\s+)?\b([a-z]+)\.?\s+(\d{1,2}),\s*(\d{4})\s+(\d{1,2}):(\d{2})\s*(a\.m\.|p\.m\.|am|pm)\s*ET\b",
    )
    .expect("date pattern is valid")
});

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// 12-hour clock to 24-hour: 12 a.m. is 0, 12 p.m. is 12.
fn to_24_hour(hour: u32, meridiem: &str) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = meridiem.to_ascii_lowercase().starts_with('p');
    Some(match (pm, hour) {
        (false, 12) => 0,
        (false, h) => h,
        (true, 12) => 12,
        (true, h) => h + 12,
    })
}

fn instant_from(caps: &Captures<'_>) -> Option<DateTime<FixedOffset>> {
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let hour = to_24_hour(caps[4].parse().ok()?, &caps[6])?;
    let minute: u32 = caps[5].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    from_eastern(date.and_time(time))
}

/// Finds the first well-formed Eastern Time date/time in `text`.
pub fn parse_et_datetime(text: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    DATE_TIME_ET
        .captures_iter(&normalized)
        .find_map(|caps| instant_from(&caps))
}

/// A line naming the speaker, with the surrounding lines to search for its date.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub line_index: usize,
    pub title: &'a str,
    /// The matching line and the lines below it, up to the window edge.
    pub following: String,
    pub window: String,
}

impl Candidate<'_> {
    /// Nearest date at or below the matching line; lines above it are only
    /// consulted when nothing below parses.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        parse_et_datetime(&self.following).or_else(|| parse_et_datetime(&self.window))
    }
}

/// Lazily yields every non-empty line matching `pattern`, top to bottom.
pub fn candidate_events<'a>(text: &'a str, pattern: &'a Regex) -> impl Iterator<Item = Candidate<'a>> + 'a {
    let lines: Vec<&'a str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    (0..lines.len()).filter_map(move |i| {
        let line = lines[i];
        if !pattern.is_match(line) {
            return None;
        }
        let start = i.saturating_sub(WINDOW_RADIUS);
        let end = (i + WINDOW_RADIUS + 1).min(lines.len());
        Some(Candidate {
            line_index: i,
            title: line.trim(),
            following: lines[i..end].join(" "),
            window: lines[start..end].join(" "),
        })
    })
}

fn to_event(candidate: &Candidate<'_>, at: DateTime<FixedOffset>, source: &str) -> FedEvent {
    FedEvent {
        title: candidate.title.to_string(),
        date_time_iso: at.to_rfc3339(),
        source: source.to_string(),
    }
}

/// The first matching line (top to bottom) whose window contains a parseable date.
pub fn find_first_event(text: &str, pattern: &Regex, source: &str) -> Option<FedEvent> {
    candidate_events(text, pattern).find_map(|c| {
        let at = c.date()?;
        Some(to_event(&c, at, source))
    })
}

/// The soonest matching event strictly after `now`. Past and unparseable entries are skipped.
pub fn next_upcoming_event(text: &str, pattern: &Regex, source: &str, now: DateTime<Utc>) -> Option<FedEvent> {
    candidate_events(text, pattern)
        .filter_map(|c| {
            let at = c.date()?;
            (at > now).then(|| (at, to_event(&c, at, source)))
        })
        .min_by_key(|(at, _)| *at)
        .map(|(_, event)| event)
}

pub fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start();
    head.starts_with('<') && (head.contains("<html") || head.contains("<body") || head.contains("</"))
}

/// Flattens an HTML page into one line per text node, skipping scripts and styles.
pub fn html_to_text(body: &str) -> String {
    let document = Html::parse_document(body);
    let mut lines = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_code = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| matches!(e.name(), "script" | "style")))
            .unwrap_or(false);
        if in_code {
            continue;
        }
        let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines.join("\n")
}
