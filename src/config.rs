use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerSettings,
    #[validate(nested)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    #[validate(nested)]
    pub pagination: PaginationSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Deadline for one whole fetch-filter-paginate run
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpstreamSettings {
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub api_key: String,
    #[serde(default = "default_upstream_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
    /// Offset increment between upstream pages
    #[serde(default = "default_page_step")]
    #[validate(range(min = 1))]
    pub page_step: usize,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationSettings {
    /// Limit applied when the caller sends none
    #[serde(default = "default_limit")]
    #[validate(range(min = 1))]
    pub default_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }
fn default_request_timeout_secs() -> u64 { 60 }
fn default_upstream_timeout_secs() -> u64 { 30 }
fn default_page_step() -> usize { crate::core::DEFAULT_PAGE_STEP }
fn default_limit() -> usize { 150 }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with FORMS__)
    /// 5. FILLOUT_URL, FILLOUT_API_KEY and PORT
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., FORMS__UPSTREAM__API_KEY -> upstream.api_key
            .add_source(
                Environment::with_prefix("FORMS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings, |key| std::env::var(key).ok())?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("FORMS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let settings: Settings = settings.try_deserialize()?;
        settings
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid configuration: {}", e)))?;
        Ok(settings)
    }
}

/// Overlay the plain environment variables deployments already use
fn apply_well_known_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = lookup("FILLOUT_URL") {
        builder = builder.set_override("upstream.base_url", url)?;
    }
    if let Some(api_key) = lookup("FILLOUT_API_KEY") {
        builder = builder.set_override("upstream.api_key", api_key)?;
    }
    if let Some(port) = lookup("PORT") {
        let port: i64 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("PORT is not a number: {:?}", port)))?;
        builder = builder.set_override("server.port", port)?;
    }

    builder.build()
}
