use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::core::rates::RateTable;
use crate::providers::RatesProvider;
use crate::providers::http::{FetchError, GetJsonOptions, get_json};

/// VATComply rates API: `GET {base}/rates` returns `{ base, rates }` with
/// EUR-based rates and no authentication.
pub struct VatComplyProvider {
    base_url: String,
    client: reqwest::Client,
}

impl VatComplyProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        VatComplyProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl RatesProvider for VatComplyProvider {
    #[instrument(name = "VatComplyFetch", skip(self, cancel))]
    async fn fetch_rates(
        &self,
        cancel: Option<CancellationToken>,
    ) -> Result<RateTable, FetchError> {
        let url = format!("{}/rates", self.base_url);
        debug!("Requesting rates from {}", url);

        let options = GetJsonOptions {
            cancel,
            ..Default::default()
        };
        let payload = get_json(&self.client, &url, &options).await?;

        RateTable::from_payload(&payload).ok_or(FetchError::InvalidPayload)
    }

    fn source_tag(&self) -> &'static str {
        "vatcomply"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider(uri: &str) -> VatComplyProvider {
        VatComplyProvider::new(uri, reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_successful_rates_fetch() {
        let mock_response = r#"{
            "base": "EUR",
            "date": "2026-08-30",
            "rates": { "USD": 1.1, "GBP": 0.9 }
        }"#;
        let mock_server = create_mock_server(mock_response).await;

        let table = provider(&mock_server.uri()).fetch_rates(None).await.unwrap();
        assert_eq!(table.base, "EUR");
        assert_eq!(table.rates["USD"], 1.1);
        assert_eq!(table.rates["GBP"], 0.9);
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let mock_response = r#"{ "base": "EUR", "rates": {} }"#;
        let mock_server = create_mock_server(mock_response).await;

        let url_with_slash = format!("{}/", mock_server.uri());
        let table = provider(&url_with_slash).fetch_rates(None).await.unwrap();
        assert_eq!(table.base, "EUR");
    }

    #[tokio::test]
    async fn test_invalid_payload_shape() {
        let mock_response = r#"{ "base": "EUR", "rates": { "USD": "not-a-number" } }"#;
        let mock_server = create_mock_server(mock_response).await;

        let err = provider(&mock_server.uri())
            .fetch_rates(None)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::InvalidPayload);
        assert_eq!(err.to_string(), "Invalid rates payload");
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"error": "down"}"#))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server.uri())
            .fetch_rates(None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 500 - down");
    }
}
