use std::time::Duration;

use crate::error::{RecommendError, Result};

const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_PROVIDER_RETRIES: usize = 10;
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Service settings read from environment variables.
///
/// Provider keys are optional: without `OPENAI_API_KEY` recommendations fail
/// with a configuration error, without `BOOKING_API_KEY` the built-in sample
/// inventory is served.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout: Duration,

    pub booking_api_key: Option<String>,
    pub booking_api_url: String,
    pub inventory_timeout: Duration,

    pub max_retries: usize,

    pub cors_origins: Vec<String>,
    pub host: String,
    pub port: u16,
    pub api_prefix: String,

    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: crate::core::language_model::DEFAULT_MODEL.to_string(),
            openai_base_url: crate::services::openai_client::DEFAULT_BASE_URL.to_string(),
            llm_timeout: Duration::from_secs(30),
            booking_api_key: None,
            booking_api_url: crate::inventory::booking::DEFAULT_BASE_URL.to_string(),
            inventory_timeout: Duration::from_secs(30),
            max_retries: 2,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_prefix: "/api/v1".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let settings = Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_timeout: parse_secs(get("LLM_TIMEOUT_SECS"), "LLM_TIMEOUT_SECS")?
                .unwrap_or(defaults.llm_timeout),
            booking_api_key: get("BOOKING_API_KEY"),
            booking_api_url: get("BOOKING_API_URL").unwrap_or(defaults.booking_api_url),
            inventory_timeout: parse_secs(get("INVENTORY_TIMEOUT_SECS"), "INVENTORY_TIMEOUT_SECS")?
                .unwrap_or(defaults.inventory_timeout),
            max_retries: parse_number(get("PROVIDER_MAX_RETRIES"), "PROVIDER_MAX_RETRIES")?
                .unwrap_or(defaults.max_retries),
            cors_origins: get("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_number(get("PORT"), "PORT")?.unwrap_or(defaults.port),
            api_prefix: get("API_V1_PREFIX").unwrap_or(defaults.api_prefix),
            log_level: get("LOG_LEVEL")
                .map(|level| level.to_lowercase())
                .unwrap_or(defaults.log_level),
            log_format: match get("LOG_FORMAT").map(|f| f.to_lowercase()).as_deref() {
                None | Some("pretty") => LogFormat::Pretty,
                Some("json") => LogFormat::Json,
                Some(other) => {
                    return Err(RecommendError::config(format!(
                        "LOG_FORMAT must be `pretty` or `json`, got `{other}`"
                    )))
                }
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, timeout) in [
            ("LLM_TIMEOUT_SECS", self.llm_timeout),
            ("INVENTORY_TIMEOUT_SECS", self.inventory_timeout),
        ] {
            if timeout.is_zero() || timeout.as_secs() > MAX_TIMEOUT_SECS {
                return Err(RecommendError::config(format!(
                    "{name} must be between 1 and {MAX_TIMEOUT_SECS} seconds"
                )));
            }
        }

        if self.max_retries > MAX_PROVIDER_RETRIES {
            return Err(RecommendError::config(format!(
                "PROVIDER_MAX_RETRIES must be at most {MAX_PROVIDER_RETRIES}"
            )));
        }

        for (name, url) in [
            ("OPENAI_BASE_URL", &self.openai_base_url),
            ("BOOKING_API_URL", &self.booking_api_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(RecommendError::config(format!(
                    "{name} must be an http(s) URL, got `{url}`"
                )));
            }
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(RecommendError::config(format!(
                "LOG_LEVEL must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }

        if !self.api_prefix.starts_with('/') {
            return Err(RecommendError::config("API_V1_PREFIX must start with `/`"));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Log which providers are configured without printing the keys.
    pub fn log_summary(&self) {
        fn state(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "set"
            } else {
                "<not set>"
            }
        }

        tracing::info!(
            openai_api_key = state(&self.openai_api_key),
            booking_api_key = state(&self.booking_api_key),
            model = %self.openai_model,
            llm_timeout_secs = self.llm_timeout.as_secs(),
            inventory_timeout_secs = self.inventory_timeout.as_secs(),
            max_retries = self.max_retries,
            "settings loaded"
        );
    }
}

fn parse_number<T: std::str::FromStr>(raw: Option<String>, name: &str) -> Result<Option<T>> {
    raw.map(|value| {
        value.parse::<T>().map_err(|_| {
            RecommendError::config(format!("{name} must be a non-negative integer, got `{value}`"))
        })
    })
    .transpose()
}

fn parse_secs(raw: Option<String>, name: &str) -> Result<Option<Duration>> {
    Ok(parse_number::<u64>(raw, name)?.map(Duration::from_secs))
}
