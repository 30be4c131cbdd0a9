use serde::Deserialize;
use serde_json::Value;

use crate::config::RatesConfig;

/// Daily JPY/HKD and EUR/HKD rates. None means "conversion unavailable",
/// never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExchangeRates {
    pub yen: Option<f64>,
    pub euro: Option<f64>,
}

impl ExchangeRates {
    /// True when any rate is missing; drives the page-level notice.
    pub fn incomplete(&self) -> bool {
        self.yen.is_none() || self.euro.is_none()
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RateResponse {
    result: RateResult,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RateResult {
    records: Vec<RateRecord>,
}

// The feed is loosely typed: numeric fields arrive as numbers, strings,
// or empty strings depending on the day.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RateRecord {
    jpy: Value,
    eur: Value,
}

#[derive(Clone)]
pub struct RateClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RateClient {
    pub fn new(config: &RatesConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Fetch the current rates. Network failures, bad statuses, and
    /// malformed bodies all collapse to absent rates; this never errors
    /// past the client boundary.
    pub async fn fetch(&self) -> ExchangeRates {
        match self.fetch_inner().await {
            Ok(rates) => rates,
            Err(e) => {
                tracing::warn!("Exchange rate fetch failed: {}", e);
                ExchangeRates::default()
            }
        }
    }

    async fn fetch_inner(&self) -> Result<ExchangeRates, reqwest::Error> {
        let response = self.http.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            tracing::warn!("Exchange rate endpoint returned {}", response.status());
            return Ok(ExchangeRates::default());
        }

        let body: RateResponse = response.json().await?;
        Ok(parse_rates(&body))
    }
}

fn parse_rates(body: &RateResponse) -> ExchangeRates {
    let Some(record) = body.result.records.first() else {
        return ExchangeRates::default();
    };
    ExchangeRates {
        yen: field_as_f64(&record.jpy),
        euro: field_as_f64(&record.eur),
    }
}

fn field_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
        _ => None,
    }
}
