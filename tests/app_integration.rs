use fxconv::{AppCommand, RunOptions};
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const RATES_BODY: &str = r#"{
        "base": "EUR",
        "date": "2024-01-15",
        "rates": {
            "EUR": 1.0,
            "USD": 1.1,
            "GBP": 0.9,
            "INR": 91.5,
            "JPY": 160.2
        }
    }"#;

    /// Mock rates endpoint; `expected_hits` asserts on drop how often the
    /// app actually reached the network.
    pub async fn create_rates_server(expected_hits: u64) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RATES_BODY))
            .expect(expected_hits)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(
        config_file: &tempfile::NamedTempFile,
        base_url: &str,
        data_path: &std::path::Path,
    ) {
        let config_content = format!(
            r#"
            provider: vatcomply
            providers:
              vatcomply:
                base_url: {}
            data_path: {}
        "#,
            base_url,
            data_path.display()
        );
        std::fs::write(config_file.path(), &config_content).expect("Failed to write config file");
    }
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = test_utils::create_rates_server(1).await;
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri(), data_dir.path());

    let result = fxconv::run_command(
        AppCommand::Convert {
            amount: "1,234.56".to_string(),
            from: "usd".to_string(),
            to: "inr".to_string(),
        },
        RunOptions {
            config_path: Some(config_file.path().to_str().unwrap().to_string()),
            offline: false,
        },
    )
    .await;

    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_cached_rates_survive_offline_runs() {
    // One network hit total: the first run populates the on-disk cache,
    // the offline rerun must be served from it.
    let mock_server = test_utils::create_rates_server(1).await;
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri(), data_dir.path());

    let config_path = config_file.path().to_str().unwrap().to_string();

    let online = fxconv::run_command(
        AppCommand::Convert {
            amount: "100".to_string(),
            from: "USD".to_string(),
            to: "GBP".to_string(),
        },
        RunOptions {
            config_path: Some(config_path.clone()),
            offline: false,
        },
    )
    .await;
    assert!(online.is_ok(), "Online run failed: {:?}", online.err());

    info!("Re-running offline against the populated cache");
    let offline = fxconv::run_command(
        AppCommand::Convert {
            amount: "100".to_string(),
            from: "USD".to_string(),
            to: "GBP".to_string(),
        },
        RunOptions {
            config_path: Some(config_path),
            offline: true,
        },
    )
    .await;
    assert!(offline.is_ok(), "Offline run failed: {:?}", offline.err());
}

#[test_log::test(tokio::test)]
async fn test_offline_without_cache_fails() {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, "http://127.0.0.1:9", data_dir.path());

    let result = fxconv::run_command(
        AppCommand::Convert {
            amount: "10".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        RunOptions {
            config_path: Some(config_file.path().to_str().unwrap().to_string()),
            offline: true,
        },
    )
    .await;

    assert!(result.is_err(), "Offline run without cache should fail");
}

#[test_log::test(tokio::test)]
async fn test_rates_command_with_mock() {
    let mock_server = test_utils::create_rates_server(1).await;
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri(), data_dir.path());

    let result = fxconv::run_command(
        AppCommand::Rates {
            base: Some("USD".to_string()),
        },
        RunOptions {
            config_path: Some(config_file.path().to_str().unwrap().to_string()),
            offline: false,
        },
    )
    .await;

    assert!(result.is_ok(), "Rates command failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_clear_cache_removes_cached_rates() {
    let mock_server = test_utils::create_rates_server(2).await;
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri(), data_dir.path());

    let config_path = config_file.path().to_str().unwrap().to_string();
    let convert = AppCommand::Convert {
        amount: "1".to_string(),
        from: "USD".to_string(),
        to: "EUR".to_string(),
    };

    let first = fxconv::run_command(
        AppCommand::Convert {
            amount: "1".to_string(),
            from: "USD".to_string(),
            to: "EUR".to_string(),
        },
        RunOptions {
            config_path: Some(config_path.clone()),
            offline: false,
        },
    )
    .await;
    assert!(first.is_ok());

    let cleared = fxconv::run_command(
        AppCommand::ClearCache,
        RunOptions {
            config_path: Some(config_path.clone()),
            offline: false,
        },
    )
    .await;
    assert!(cleared.is_ok(), "Clear cache failed: {:?}", cleared.err());

    // With the cache gone the next conversion must hit the network again.
    let second = fxconv::run_command(
        convert,
        RunOptions {
            config_path: Some(config_path),
            offline: false,
        },
    )
    .await;
    assert!(second.is_ok(), "Second run failed: {:?}", second.err());
}

#[test_log::test(tokio::test)]
async fn test_currencies_command_needs_no_network() {
    let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, "http://127.0.0.1:9", data_dir.path());

    let result = fxconv::run_command(
        AppCommand::Currencies {
            query: Some("rupee".to_string()),
        },
        RunOptions {
            config_path: Some(config_file.path().to_str().unwrap().to_string()),
            offline: true,
        },
    )
    .await;

    assert!(result.is_ok(), "Currencies failed: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let result = fxconv::run_command(
        AppCommand::Rates { base: None },
        RunOptions {
            config_path: Some("/nonexistent/config.yaml".to_string()),
            offline: true,
        },
    )
    .await;

    assert!(result.is_err());
    let message = result.err().unwrap().to_string();
    assert!(message.contains("Failed to read config file"), "{message}");
}
