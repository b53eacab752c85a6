//! Configuration management for the shop chat server
//!
//! Built-in defaults are layered under an optional `config.toml` and
//! `SHOPCHAT__SECTION__KEY` environment overrides. The upstream credential may
//! also come from the conventional `OPENAI_API_KEY` variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Locations tried for `config.toml`, first hit wins.
const CONFIG_PATHS: [&str; 2] = [
    "shop-chat-server/config", // container layout: /app/shop-chat-server/config.toml
    "config",                  // local development: ./config.toml
];

const ENV_PREFIX: &str = "SHOPCHAT";
const API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI cashier for a local shop. \
Answer briefly and only about the shop's products. Use the provided catalog items \
when they are relevant and never invent prices or stock levels.";

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub admission: AdmissionConfig,
    pub completion: CompletionConfig,
    pub session: SessionConfig,
}

/// Listener and request-shape settings (restart required)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind_address: String,
    pub port: u16,

    /// JSON product catalog, loaded once at startup
    pub catalog_path: String,

    /// Messages longer than this are truncated before matching
    pub max_message_chars: usize,
}

/// Origin allow-list and rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    pub allowed_hosts: Vec<String>,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,

    /// Honour X-Forwarded-For / X-Real-IP set by the reverse proxy
    pub trust_forwarded_for: bool,

    /// How often fully expired rate-limit buckets are dropped
    pub purge_interval_secs: u64,
}

/// External chat-completion service
#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub shortlist_size: usize,

    /// Absent means demo mode
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            catalog_path: "products.json".to_string(),
            max_message_chars: 1000,
        }
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: vec![
                "localhost".to_string(),
                "127.0.0.1".to_string(),
                "::1".to_string(),
            ],
            rate_limit_max_requests: 30,
            rate_limit_window_secs: 300,
            trust_forwarded_for: true,
            purge_interval_secs: 60,
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            shortlist_size: 6,
            api_key: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sid".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: HttpConfig::default(),
            admission: AdmissionConfig::default(),
            completion: CompletionConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

// Keeps the credential out of startup logs.
impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("shortlist_size", &self.shortlist_size)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from defaults, config.toml and the environment
    pub fn load() -> Result<Self, ConfigurationError> {
        let defaults = Config::try_from(&ServerConfig::default())?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = find_config_file() {
            log::info!("Using configuration file {}.toml", path);
            builder = builder.add_source(File::with_name(path));
        } else {
            log::info!("No config.toml found, using defaults and environment");
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("admission.allowed_hosts"),
            )
            .build()?;

        let mut config: ServerConfig = settings.try_deserialize()?;

        if config.completion.api_key.is_none() {
            config.completion.api_key = std::env::var(API_KEY_VAR).ok();
        }
        config.completion.api_key = config
            .completion
            .api_key
            .take()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.server.port == 0 {
            return Err(ConfigurationError::Invalid("port cannot be 0".into()));
        }

        if self.server.catalog_path.trim().is_empty() {
            return Err(ConfigurationError::Invalid(
                "catalog_path cannot be empty".into(),
            ));
        }

        if self.server.max_message_chars == 0 {
            return Err(ConfigurationError::Invalid(
                "max_message_chars must be greater than 0".into(),
            ));
        }

        if self.admission.allowed_hosts.is_empty() {
            return Err(ConfigurationError::Invalid(
                "allowed_hosts must list at least one host".into(),
            ));
        }

        if self.admission.rate_limit_max_requests == 0 || self.admission.rate_limit_window_secs == 0
        {
            return Err(ConfigurationError::Invalid(
                "rate limit ceiling and window must be greater than 0".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(ConfigurationError::Invalid(format!(
                "temperature {} outside 0..=2",
                self.completion.temperature
            )));
        }

        if self.completion.shortlist_size == 0 {
            return Err(ConfigurationError::Invalid(
                "shortlist_size must be greater than 0".into(),
            ));
        }

        if self.session.cookie_name.is_empty() {
            return Err(ConfigurationError::Invalid(
                "cookie_name cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl HttpConfig {
    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn catalog_path(&self) -> PathBuf {
        PathBuf::from(&self.catalog_path)
    }
}

impl AdmissionConfig {
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs.max(1))
    }
}

fn find_config_file() -> Option<&'static str> {
    CONFIG_PATHS
        .iter()
        .copied()
        .find(|path| Path::new(&format!("{path}.toml")).is_file())
}

impl From<ConfigError> for ConfigurationError {
    fn from(error: ConfigError) -> Self {
        ConfigurationError::Load(error.to_string())
    }
}
