//! # Garden API Client
//!
//! Implements the `StatusSource` trait against the Grow A Garden public API.
//! Normalizes raw payloads into domain snapshots: duplicate stock entries are
//! merged by summing quantities, items come back sorted by name, weather
//! events keep source order.

use crate::domain::config::ApiConfig;
use crate::domain::errors::FetchError;
use crate::domain::traits::StatusSource;
use crate::domain::types::{Shop, StockItem, StockSnapshot, WeatherEvent, WeatherSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// The upstream API rejects default client agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:138.0) Gecko/20100101 Firefox/138.0";

#[derive(Debug, Deserialize)]
struct RawStockItem {
    display_name: String,
    quantity: u64,
}

#[derive(Debug, Deserialize)]
struct RawWeatherEvent {
    weather_name: String,
    active: bool,
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    start_duration_unix: i64,
    #[serde(default)]
    end_duration_unix: i64,
}

#[derive(Debug, Deserialize)]
struct RawWeatherResponse {
    #[serde(default)]
    weather: Vec<RawWeatherEvent>,
}

pub struct GardenApi {
    client: Client,
    stock_url: String,
    weather_url: String,
}

impl GardenApi {
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            stock_url: config.stock_url.clone(),
            weather_url: config.weather_url.clone(),
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(response.json().await?)
    }
}

/// Sums quantities of entries sharing a display name. The map keeps the
/// result sorted by name.
fn merge_duplicates(raw: Vec<RawStockItem>) -> Vec<StockItem> {
    let mut merged: BTreeMap<String, u64> = BTreeMap::new();
    for item in raw {
        *merged.entry(item.display_name).or_insert(0) += item.quantity;
    }
    merged
        .into_iter()
        .map(|(name, quantity)| StockItem { name, quantity })
        .collect()
}

fn positive_timestamp(ts: i64) -> Option<i64> {
    (ts > 0).then_some(ts)
}

#[async_trait]
impl StatusSource for GardenApi {
    async fn stock(&self, shop: Shop) -> Result<StockSnapshot, FetchError> {
        let data = self.fetch_json(&self.stock_url).await?;
        let listing = data
            .get(shop.key())
            .cloned()
            .ok_or_else(|| FetchError::Shape(format!("no `{}` listing in response", shop.key())))?;
        let raw: Vec<RawStockItem> = serde_json::from_value(listing)
            .map_err(|e| FetchError::Shape(format!("invalid `{}` listing: {e}", shop.key())))?;
        if raw.is_empty() {
            return Err(FetchError::Shape(format!("`{}` listing is empty", shop.key())));
        }

        Ok(StockSnapshot {
            shop,
            items: merge_duplicates(raw),
        })
    }

    async fn weather(&self) -> Result<WeatherSnapshot, FetchError> {
        let data = self.fetch_json(&self.weather_url).await?;
        let raw: RawWeatherResponse = serde_json::from_value(data)
            .map_err(|e| FetchError::Shape(format!("invalid weather response: {e}")))?;

        let events = raw
            .weather
            .into_iter()
            .map(|event| WeatherEvent {
                name: event.weather_name,
                active: event.active,
                duration: event.duration,
                starts_at: positive_timestamp(event.start_duration_unix),
                ends_at: positive_timestamp(event.end_duration_unix),
            })
            .collect();

        Ok(WeatherSnapshot { events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, quantity: u64) -> RawStockItem {
        RawStockItem {
            display_name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn duplicate_names_are_summed() {
        let items = merge_duplicates(vec![raw("Grape", 2), raw("Cacao", 1), raw("Grape", 3)]);
        assert_eq!(
            items,
            vec![
                StockItem { name: "Cacao".into(), quantity: 1 },
                StockItem { name: "Grape".into(), quantity: 5 },
            ]
        );
    }

    #[test]
    fn merged_items_are_sorted_by_name() {
        let items = merge_duplicates(vec![raw("Pepper", 1), raw("Beanstalk", 4), raw("Mango", 0)]);
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Beanstalk", "Mango", "Pepper"]);
    }

    #[test]
    fn zero_timestamps_are_dropped() {
        assert_eq!(positive_timestamp(0), None);
        assert_eq!(positive_timestamp(-1), None);
        assert_eq!(positive_timestamp(1_750_000_000), Some(1_750_000_000));
    }
}
