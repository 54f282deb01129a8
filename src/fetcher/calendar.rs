use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::calendar::parser::{html_to_text, looks_like_html, next_upcoming_event};
use crate::models::FedEvent;

/// Scrapes the Federal Reserve calendar for the next scheduled appearance of the speaker.
pub struct FedCalendarFetcher {
    url: String,
    pattern: Regex,
    client: Client,
}

impl FedCalendarFetcher {
    pub fn new(url: String, pattern: Regex, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("RecessionDashboard/1.0"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { url, pattern, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_text(&self) -> Result<String> {
        let resp = self.client.get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(anyhow!("Calendar fetch failed: {}", resp.status()));
        }

        let body = resp.text().await?;
        // The reader proxy returns plain text; the raw calendar page is HTML
        if looks_like_html(&body) {
            Ok(html_to_text(&body))
        } else {
            Ok(body)
        }
    }

    /// The next upcoming event, or None when the page is unreachable or lists nothing parseable.
    pub async fn fetch_next_event(&self, now: DateTime<Utc>) -> Option<FedEvent> {
        let text = match self.fetch_text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(url = %self.url, error = %e, "Fed calendar unavailable");
                return None;
            }
        };
        debug!(bytes = text.len(), "Fed calendar fetched");

        let event = next_upcoming_event(&text, &self.pattern, &self.url, now);
        match &event {
            Some(e) => info!(title = %e.title, at = %e.date_time_iso, "Next Fed event found"),
            None => info!("No upcoming Fed event on calendar"),
        }
        event
    }
}
