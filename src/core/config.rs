use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, time::Duration};
use tracing::debug;

/// Which rates API the client talks to.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RatesSource {
    #[default]
    Vatcomply,
    Fxrates,
}

impl fmt::Display for RatesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatesSource::Vatcomply => write!(f, "vatcomply"),
            RatesSource::Fxrates => write!(f, "fxrates"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VatComplyProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FxRatesProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub vatcomply: Option<VatComplyProviderConfig>,
    pub fxrates: Option<FxRatesProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            vatcomply: Some(VatComplyProviderConfig {
                base_url: "https://api.vatcomply.com".to_string(),
            }),
            fxrates: Some(FxRatesProviderConfig {
                base_url: "https://api.fxratesapi.com".to_string(),
                api_key: None,
            }),
        }
    }
}

/// Fallback currency pair used before any preferences are saved.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PairDefaults {
    pub from: String,
    pub to: String,
}

impl Default for PairDefaults {
    fn default() -> Self {
        PairDefaults {
            from: "USD".to_string(),
            to: "EUR".to_string(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: RatesSource,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Formatting locale tag, e.g. "de-DE". Defaults to en-US.
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub defaults: PairDefaults,
    #[serde(default)]
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: RatesSource::default(),
            providers: ProvidersConfig::default(),
            locale: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            defaults: PairDefaults::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Load config from the default location; a missing file yields the
    /// built-in defaults since every field has one.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "fxconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider: fxrates
providers:
  vatcomply:
    base_url: "http://example.com/vats"
  fxrates:
    base_url: "http://example.com/fx"
    api_key: "secret"
locale: "de-DE"
cache_ttl_secs: 60
defaults:
  from: "CHF"
  to: "JPY"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider, RatesSource::Fxrates);
        assert_eq!(
            config.providers.fxrates.as_ref().unwrap().base_url,
            "http://example.com/fx"
        );
        assert_eq!(
            config.providers.fxrates.as_ref().unwrap().api_key.as_deref(),
            Some("secret")
        );
        assert_eq!(config.locale.as_deref(), Some("de-DE"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.defaults.from, "CHF");
        assert_eq!(config.defaults.to, "JPY");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.provider, RatesSource::Vatcomply);
        assert_eq!(
            config.providers.vatcomply.unwrap().base_url,
            "https://api.vatcomply.com"
        );
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.defaults.from, "USD");
        assert_eq!(config.defaults.to, "EUR");
        assert!(config.locale.is_none());
    }
}
