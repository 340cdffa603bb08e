use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Main configuration structure for deepsilo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub gemini: GeminiConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
    /// Path of the JSON file backing the key-value store.
    pub data_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Seed credential; the stored credential takes precedence once set.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Model for schema-constrained research queries.
    pub model: String,
    /// Model for follow-up chat turns.
    pub chat_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub limit: usize,
}

impl Config {
    /// Load configuration from file with environment variable overrides.
    /// ALWAYS returns a valid config - never fails.
    pub fn load() -> Self {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("Loaded environment from .env");
        }

        let config_path =
            env::var("DEEPSILO_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = env::var("GEMINI_API_KEY") {
            self.gemini.api_key = Some(api_key);
        }
        if let Ok(model) = env::var("DEEPSILO_MODEL") {
            self.gemini.model = model;
        }
        if let Ok(chat_model) = env::var("DEEPSILO_CHAT_MODEL") {
            self.gemini.chat_model = chat_model;
        }
        if let Ok(base_url) = env::var("DEEPSILO_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Ok(data_path) = env::var("DEEPSILO_DATA_PATH") {
            self.app.data_path = data_path;
        }
        if let Ok(limit) = env::var("DEEPSILO_HISTORY_LIMIT") {
            if let Ok(limit_num) = limit.parse() {
                self.history.limit = limit_num;
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.gemini.model.is_empty() {
            return Err("Gemini model cannot be empty".into());
        }
        if self.gemini.chat_model.is_empty() {
            return Err("Gemini chat model cannot be empty".into());
        }
        if self.gemini.base_url.is_empty() {
            return Err("Gemini base URL cannot be empty".into());
        }
        if self.history.limit == 0 {
            return Err("History limit cannot be 0".into());
        }
        if self.gemini.api_key.as_deref() == Some("") {
            return Err("GEMINI_API_KEY is set but empty".into());
        }
        // A missing key is not an error: the session starts at the
        // credential entry screen instead.
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                name: "deepsilo".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                data_path: "deepsilo.json".to_string(),
            },
            gemini: GeminiConfig {
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: "gemini-2.5-flash".to_string(),
                chat_model: "gemini-2.5-flash".to_string(),
            },
            history: HistoryConfig {
                limit: crate::history::HISTORY_LIMIT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.history.limit, 50);
    }

    #[test]
    fn empty_model_fails_validation() {
        let mut config = Config::default();
        config.gemini.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_history_limit_fails_validation() {
        let mut config = Config::default();
        config.history.limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip_preserves_fields() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).expect("serialize");
        let back: Config = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(back.gemini.model, config.gemini.model);
        assert_eq!(back.app.data_path, config.app.data_path);
    }
}
