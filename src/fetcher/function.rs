use async_trait::async_trait;
use crate::error::DashboardError;
use crate::indicators::IndicatorId;
use crate::models::RawObservation;
use super::{parse_date, DataSource};
use anyhow::{Result, anyhow};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Serialize)]
struct FunctionRequest<'a> {
    indicator: &'a str,
}

/// `{ success, data?: [{date, value, month}], error? }`
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Vec<EnvelopeRow>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeRow {
    date: String,
    #[serde(default)]
    value: Value,
}

/// The hosted economic-data function: POST `{ indicator }`, receive a JSON envelope.
pub struct FunctionSource {
    url: String,
    client: Client,
}

impl FunctionSource {
    pub fn new(url: String, api_key: Option<&str>, timeout: std::time::Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("RecessionDashboard/1.0"));
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
            headers.insert("apikey", HeaderValue::from_str(key)?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { url, client })
    }

    fn parse_envelope(json: &Value) -> Result<Vec<RawObservation>> {
        let envelope: Envelope = serde_json::from_value(json.clone())
            .map_err(|e| anyhow!("Malformed envelope: {}", e))?;

        if !envelope.success {
            let message = envelope.error.unwrap_or_else(|| "no error message".to_string());
            return Err(DashboardError::Envelope(message).into());
        }

        let rows = envelope
            .data
            .ok_or_else(|| anyhow!("Envelope reported success without data"))?;

        let mut observations = Vec::with_capacity(rows.len());
        for row in rows {
            // Values arrive as numbers; NaN serializes to null and "." can leak through as text
            let value = match &row.value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) if s != "." => s.parse::<f64>().ok(),
                _ => None,
            };
            if let Some(value) = value {
                observations.push(RawObservation { date: parse_date(&row.date)?, value });
            }
        }

        Ok(observations)
    }
}

#[async_trait]
impl DataSource for FunctionSource {
    fn name(&self) -> &str {
        "function"
    }

    async fn fetch_data(&self, indicator: IndicatorId, _limit: usize) -> Result<Vec<RawObservation>> {
        debug!(indicator = %indicator, url = %self.url, "Calling economic-data function");

        let resp = self
            .client
            .post(&self.url)
            .json(&FunctionRequest { indicator: indicator.as_str() })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Function returned non-JSON body ({}): {}", status, e))?;

        if !status.is_success() {
            let message = json["error"].as_str().unwrap_or("no error message");
            return Err(anyhow!("Function error: {} - {}", status, message));
        }

        Self::parse_envelope(&json)
    }
}
