use async_trait::async_trait;
use crate::indicators::registry::Registry;
use crate::indicators::IndicatorId;
use crate::models::RawObservation;
use super::{parse_date, DataSource};
use anyhow::{Result, anyhow};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org";

/// Direct FRED access, used when no function endpoint is configured.
pub struct FredSource {
    api_key: String,
    client: Client,
    base_url: String,
}

impl FredSource {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { api_key, client, base_url: FRED_BASE_URL.to_string() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl DataSource for FredSource {
    fn name(&self) -> &str {
        "fred"
    }

    async fn fetch_data(&self, indicator: IndicatorId, limit: usize) -> Result<Vec<RawObservation>> {
        let sanitized_key = self.api_key.trim().to_lowercase();

        // Never log the key itself
        debug!(key_len = sanitized_key.len(), "FRED fetch");

        if sanitized_key.is_empty() {
            return Err(anyhow!("FRED API key is empty or missing"));
        }
        if sanitized_key.len() != 32 {
            warn!(key_len = sanitized_key.len(), "FRED API key is not 32 characters; request will likely fail");
        }

        let series_id = &Registry::metadata(indicator).series_id;
        let url = format!("{}/fred/series/observations", self.base_url);
        let limit = limit.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id.as_str()),
                ("api_key", sanitized_key.as_str()),
                ("file_type", "json"),
                ("limit", limit.as_str()),
                ("sort_order", "desc"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("FRED API error: {} - Body: {}", status, error_text));
        }

        let json: Value = resp.json().await?;
        let mut points = Self::parse_observations(&json)?;
        // FRED returns newest first with sort_order=desc
        points.reverse();
        Ok(points)
    }
}

impl FredSource {
    fn parse_observations(json: &Value) -> Result<Vec<RawObservation>> {
        let observations = json["observations"]
            .as_array()
            .ok_or_else(|| anyhow!("No observations found in FRED response"))?;

        let mut data_points = Vec::new();

        for obs in observations {
            // "date": "2023-01-01", "value": "123.45"
            if let (Some(date_str), Some(value_str)) = (obs["date"].as_str(), obs["value"].as_str()) {
                // "." marks a missing observation
                if value_str == "." {
                    continue;
                }

                if let Ok(value) = value_str.parse::<f64>() {
                    data_points.push(RawObservation {
                        date: parse_date(date_str)?,
                        value,
                    });
                }
            }
        }

        Ok(data_points)
    }
}
