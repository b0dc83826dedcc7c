use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::pipeline::PipelineConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable 'OPENROUTER_API_KEY' is not set (REQUIRE_API_KEY=true)")]
    MissingApiKey,
}

/// Application configuration loaded from environment variables.
///
/// A missing API key is only fatal when `REQUIRE_API_KEY` is true; otherwise
/// the service starts degraded and reports itself as not initialised.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub require_api_key: bool,
    pub model_name: String,
    pub api_url: String,
    pub completion_timeout: Duration,
    pub index_dir: PathBuf,
    pub retrieval_k: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            api_key: optional_env("OPENROUTER_API_KEY"),
            require_api_key: parse_env("REQUIRE_API_KEY", false)?,
            model_name: optional_env("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_url: optional_env("COMPLETION_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            completion_timeout: Duration::from_secs(parse_env(
                "COMPLETION_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            index_dir: optional_env("INDEX_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("vectorstore_guarani")),
            retrieval_k: parse_env("RETRIEVAL_K", 3)?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };
        Ok(config)
    }

    /// Fails only in strict mode; `serve` logs the degraded case.
    pub fn check_credentials(&self) -> Result<(), ConfigError> {
        if self.require_api_key && self.api_key.is_none() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            retrieval_k: self.retrieval_k.max(1),
            ..PipelineConfig::default()
        }
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Lenient config with defaults and no key.
    pub fn for_tests() -> Self {
        Config {
            api_key: None,
            require_api_key: false,
            model_name: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            completion_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            index_dir: PathBuf::from("vectorstore_guarani"),
            retrieval_k: 3,
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_fatal_only_when_strict() {
        let lenient = Config::for_tests();
        assert!(lenient.check_credentials().is_ok());

        let strict = Config {
            require_api_key: true,
            ..Config::for_tests()
        };
        assert!(matches!(
            strict.check_credentials(),
            Err(ConfigError::MissingApiKey)
        ));

        let strict_with_key = Config {
            api_key: Some("sk-test".into()),
            require_api_key: true,
            ..Config::for_tests()
        };
        assert!(strict_with_key.check_credentials().is_ok());
    }

    #[test]
    fn test_pipeline_config_uses_retrieval_k() {
        let config = Config {
            retrieval_k: 5,
            ..Config::for_tests()
        };
        assert_eq!(config.pipeline_config().retrieval_k, 5);
        let zero = Config {
            retrieval_k: 0,
            ..Config::for_tests()
        };
        assert_eq!(zero.pipeline_config().retrieval_k, 1);
    }

    #[test]
    fn test_parse_env_default_when_unset() {
        let v: u16 = parse_env("GUARANI_RAG_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(v, 42);
    }
}
