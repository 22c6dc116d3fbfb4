use async_trait::async_trait;
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::core::rates::RateTable;
use crate::providers::RatesProvider;
use crate::providers::http::{FetchError, GetJsonOptions, get_json};

/// fxratesapi: `GET {base}/latest?api_key=...` returns `{ base, rates }`.
/// The key is optional; anonymous requests are rate-limited harder.
pub struct FxRatesProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl FxRatesProvider {
    pub fn new(base_url: &str, api_key: Option<String>, client: reqwest::Client) -> Self {
        FxRatesProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    fn build_url(&self) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&format!("{}/latest", self.base_url)).map_err(|_| FetchError::Network)?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("api_key", key);
        }
        Ok(url)
    }
}

#[async_trait]
impl RatesProvider for FxRatesProvider {
    #[instrument(name = "FxRatesFetch", skip(self, cancel))]
    async fn fetch_rates(
        &self,
        cancel: Option<CancellationToken>,
    ) -> Result<RateTable, FetchError> {
        let url = self.build_url()?;
        debug!("Requesting rates from {}", url);

        let options = GetJsonOptions {
            cancel,
            ..Default::default()
        };
        let payload = get_json(&self.client, url.as_str(), &options).await?;

        RateTable::from_payload(&payload).ok_or(FetchError::InvalidPayload)
    }

    fn source_tag(&self) -> &'static str {
        "fxrates"
    }
}
