pub mod fxrates;
pub mod http;
pub mod vatcomply;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::config::{AppConfig, RatesSource};
use crate::core::rates::RateTable;
use http::FetchError;

/// A remote source of exchange-rate tables.
#[async_trait]
pub trait RatesProvider: Send + Sync {
    async fn fetch_rates(&self, cancel: Option<CancellationToken>)
    -> Result<RateTable, FetchError>;

    /// Short label recorded alongside cached entries.
    fn source_tag(&self) -> &'static str;
}

/// Build the configured provider with a shared HTTP client.
pub fn build_provider(config: &AppConfig) -> Result<Arc<dyn RatesProvider>> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    Ok(match config.provider {
        RatesSource::Vatcomply => {
            let base_url = config
                .providers
                .vatcomply
                .as_ref()
                .map_or("https://api.vatcomply.com", |p| &p.base_url);
            Arc::new(vatcomply::VatComplyProvider::new(base_url, client))
        }
        RatesSource::Fxrates => {
            let fxrates = config.providers.fxrates.as_ref();
            let base_url = fxrates.map_or("https://api.fxratesapi.com", |p| &p.base_url);
            let api_key = fxrates.and_then(|p| p.api_key.clone());
            Arc::new(fxrates::FxRatesProvider::new(base_url, api_key, client))
        }
    })
}
