//! Storefront endpoint, transport and logging configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level storefront configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Commerce (storefront) API settings.
    pub commerce: CommerceConfig,

    /// Secondary backend settings. Absent means the custom sections are skipped.
    #[serde(default)]
    pub custom_api: Option<CustomApiConfig>,

    /// Transport settings.
    #[serde(default)]
    pub transport: TransportConfig,

    /// Diagnostic logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Load config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check endpoint URLs and logging names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint("commerce.endpoint", &self.commerce.endpoint)?;
        if let Some(custom) = &self.custom_api {
            validate_endpoint("custom_api.endpoint", &custom.endpoint)?;
        }
        if self.commerce.token_header.is_some() != self.commerce.token.is_some() {
            return Err(ConfigError::Invalid(
                "commerce.token_header and commerce.token must be set together".to_string(),
            ));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be one of {:?}, got '{}'",
                LOG_FORMATS, self.logging.format
            )));
        }
        let level = self.logging.min_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.min_level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.logging.min_level
            )));
        }
        Ok(())
    }

    /// Custom API endpoint, if configured.
    pub fn custom_endpoint(&self) -> Option<&str> {
        self.custom_api.as_ref().map(|c| c.endpoint.as_str())
    }
}

fn validate_endpoint(key: &str, endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be an http(s) URL, got '{}'",
            key, endpoint
        )))
    }
}

/// Accepted `logging.format` values.
pub const LOG_FORMATS: &[&str] = &["json", "human", "tracing"];

/// Accepted `logging.min_level` values, matched case-insensitively.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];

/// Commerce API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,

    /// Header carrying the storefront access token (e.g.
    /// `X-Shopify-Storefront-Access-Token`). Token issuance is external.
    #[serde(default)]
    pub token_header: Option<String>,

    /// Opaque token value sent in `token_header`.
    #[serde(default)]
    pub token: Option<String>,
}

impl CommerceConfig {
    /// Header pair to attach to every commerce request.
    pub fn token_pair(&self) -> Option<(&str, &str)> {
        match (&self.token_header, &self.token) {
            (Some(header), Some(token)) => Some((header.as_str(), token.as_str())),
            _ => None,
        }
    }
}

/// Secondary backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomApiConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
}

/// Transport configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Whole-request timeout in milliseconds. Unset means the HTTP client's default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl TransportConfig {
    /// Timeout as a `Duration`.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format: `json`, `human` or `tracing`.
    #[serde(default = "default_format")]
    pub format: String,

    /// Minimum level recorded.
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

fn default_format() -> String {
    "tracing".to_string()
}

fn default_min_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            min_level: default_min_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[commerce]
endpoint = "https://shop.example.com/api/2025-01/graphql.json"
token_header = "X-Shopify-Storefront-Access-Token"
token = "public-token"

[custom_api]
endpoint = "https://api.example.com/graphql"

[transport]
timeout_ms = 1500

[logging]
format = "json"
min_level = "debug"
"#;

    #[test]
    fn test_config_full() {
        let config = StorefrontConfig::from_toml(FULL).unwrap();

        assert_eq!(
            config.commerce.endpoint,
            "https://shop.example.com/api/2025-01/graphql.json"
        );
        assert_eq!(
            config.commerce.token_pair(),
            Some(("X-Shopify-Storefront-Access-Token", "public-token"))
        );
        assert_eq!(config.custom_endpoint(), Some("https://api.example.com/graphql"));
        assert_eq!(config.transport.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.min_level, "debug");
    }

    #[test]
    fn test_config_defaults() {
        let config =
            StorefrontConfig::from_toml("[commerce]\nendpoint = \"https://shop.example.com\"\n")
                .unwrap();

        assert!(config.custom_api.is_none());
        assert!(config.commerce.token_pair().is_none());
        assert!(config.transport.timeout().is_none());
        assert_eq!(config.logging.format, "tracing");
        assert_eq!(config.logging.min_level, "info");
    }

    #[test]
    fn test_config_rejects_bad_endpoint() {
        let err = StorefrontConfig::from_toml("[commerce]\nendpoint = \"shop.example.com\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_config_rejects_half_token() {
        let toml = "[commerce]\nendpoint = \"https://a.example\"\ntoken = \"t\"\n";
        assert!(matches!(
            StorefrontConfig::from_toml(toml).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn test_config_rejects_unknown_level() {
        let toml = "[commerce]\nendpoint = \"https://a.example\"\n[logging]\nmin_level = \"loud\"\n";
        assert!(matches!(
            StorefrontConfig::from_toml(toml).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn test_config_level_ignores_case() {
        for level in ["INFO", "Warning", "debug"] {
            let toml = format!(
                "[commerce]\nendpoint = \"https://a.example\"\n[logging]\nmin_level = \"{}\"\n",
                level
            );
            assert!(StorefrontConfig::from_toml(&toml).is_ok(), "{}", level);
        }
    }

    #[test]
    fn test_config_parse_error() {
        let err = StorefrontConfig::from_toml("[commerce\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = StorefrontConfig::load("/nonexistent/storefront.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
