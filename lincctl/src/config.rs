//! Console configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `lincctl.yaml` but can be specified via `-f` flag or `LINCCTL_CONFIG`
//! environment variable. A missing file is not an error: every field has a default.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `lincctl.yaml`)
//! 2. **Environment variables** - Variables prefixed with `LINCCTL_` override YAML values
//! 3. **LINC_API_TOKEN** - Special case: overrides `api.token` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `LINCCTL_API__BASE_URL=https://linc.example.gov.za` sets the `api.base_url` field.
//!
//! ## Example
//!
//! ```yaml
//! api:
//!   base_url: https://linc.example.gov.za
//!   prefix: /api/v1
//!   request_timeout: 30s
//! search:
//!   min_query_length: 2
//!   debounce: 500ms
//! list:
//!   page_size: 20
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::Error;

/// Global CLI args shared by every subcommand
#[derive(Parser, Debug, Clone)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "LINCCTL_CONFIG", default_value = "lincctl.yaml", global = true)]
    pub config: String,

    /// Validate configuration and exit without contacting the API.
    #[arg(long, global = true)]
    pub validate: bool,
}

/// Main console configuration.
///
/// All fields have sensible defaults defined in the `Default` implementations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// REST API connection settings
    pub api: ApiConfig,
    /// Debounced user search settings
    pub search: SearchConfig,
    /// List page settings
    pub list: ListConfig,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// REST API connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Server root, e.g. `https://linc.example.gov.za`
    pub base_url: Url,
    /// Versioned path all endpoints live under
    pub prefix: String,
    /// Bearer token attached to every request. Issuing and refreshing it is out of scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:8000").expect("default base url is valid"),
            prefix: "/api/v1".to_string(),
            token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Debounced user search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Queries shorter than this reset the results without a request
    pub min_query_length: usize,
    /// Quiet period after the last keystroke before searching
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
    /// Maximum number of users returned per search
    pub result_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: 2,
            debounce: Duration::from_millis(500),
            result_limit: 10,
        }
    }
}

/// List page settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
    /// Rows per client-side page
    pub page_size: usize,
    /// `limit` sent when a page loads "everything"
    pub fetch_limit: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            fetch_limit: 1000,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if !self.api.prefix.starts_with('/') {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: api.prefix must start with '/' (got {:?})",
                    self.api.prefix
                ),
            });
        }

        if !matches!(self.api.base_url.scheme(), "http" | "https") {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: api.base_url must use http or https (got {})",
                    self.api.base_url.scheme()
                ),
            });
        }

        if self.api.request_timeout.is_zero() {
            return Err(Error::Internal {
                operation: "Config validation: api.request_timeout must be greater than zero".to_string(),
            });
        }

        if self.search.min_query_length == 0 {
            return Err(Error::Internal {
                operation: "Config validation: search.min_query_length must be at least 1".to_string(),
            });
        }

        if self.list.page_size == 0 || self.list.fetch_limit == 0 {
            return Err(Error::Internal {
                operation: "Config validation: list.page_size and list.fetch_limit must be positive".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("LINCCTL_").ignore(&["CONFIG"]).split("__"))
            // Token shared with the other LINC tools
            .merge(Env::raw().only(&["LINC_API_TOKEN"]).map(|_| "api.token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load(&args("missing.yaml"))?;

            assert_eq!(config.api.base_url.as_str(), "http://localhost:8000/");
            assert_eq!(config.api.prefix, "/api/v1");
            assert_eq!(config.api.token, None);
            assert_eq!(config.search.min_query_length, 2);
            assert_eq!(config.search.debounce, Duration::from_millis(500));
            assert_eq!(config.list.page_size, 10);
            assert!(!config.enable_otel_export);

            Ok(())
        });
    }

    #[test]
    fn test_yaml_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
api:
  base_url: https://linc.example.gov.za
  prefix: /api/v2
  request_timeout: 5s
search:
  debounce: 250ms
  result_limit: 25
list:
  page_size: 50
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.api.base_url.as_str(), "https://linc.example.gov.za/");
            assert_eq!(config.api.prefix, "/api/v2");
            assert_eq!(config.api.request_timeout, Duration::from_secs(5));
            assert_eq!(config.search.debounce, Duration::from_millis(250));
            assert_eq!(config.search.result_limit, 25);
            assert_eq!(config.search.min_query_length, 2); // default
            assert_eq!(config.list.page_size, 50);

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
api:
  base_url: https://linc.example.gov.za
"#,
            )?;

            jail.set_env("LINCCTL_API__BASE_URL", "http://127.0.0.1:9000");
            jail.set_env("LINCCTL_LIST__PAGE_SIZE", "25");
            jail.set_env("LINC_API_TOKEN", "secret-token");

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.api.base_url.as_str(), "http://127.0.0.1:9000/");
            assert_eq!(config.list.page_size, 25);
            assert_eq!(config.api.token.as_deref(), Some("secret-token"));

            Ok(())
        });
    }

    #[test]
    fn test_unknown_field_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "api:\n  base_uri: http://typo\n")?;

            assert!(Config::load(&args("test.yaml")).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_prefix_must_be_absolute() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "api:\n  prefix: api/v1\n")?;

            let err = Config::load(&args("test.yaml")).unwrap_err();
            assert!(err.to_string().contains("api.prefix"));

            Ok(())
        });
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = Config::default();
        config.list.page_size = 0;
        assert!(config.validate().is_err());
    }
}
