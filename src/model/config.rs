use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "RCA_REVIEW_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_ANALYSIS_MODEL: &str = "ANALYSIS_MODEL";
const ENV_CHAT_MODEL: &str = "CHAT_MODEL";

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_ANALYSIS_TEMPERATURE: f64 = 0.3;
const DEFAULT_CHAT_TEMPERATURE: f64 = 0.4;

/// Messages of a session sent back to the LLM as conversation context
const DEFAULT_CHAT_CONTEXT_LIMIT: usize = 20;
/// Hard upper bound for the analyses listing
pub const MAX_RECENT_ANALYSES: usize = 10;

/// LLM model and sampling configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub analysis_model: String,
    pub chat_model: String,
    /// Low temperature keeps scoring consistent across resubmissions
    pub analysis_temperature: f64,
    pub chat_temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            analysis_model: DEFAULT_MODEL.to_string(),
            chat_model: DEFAULT_MODEL.to_string(),
            analysis_temperature: DEFAULT_ANALYSIS_TEMPERATURE,
            chat_temperature: DEFAULT_CHAT_TEMPERATURE,
        }
    }
}

/// History limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub chat_context_limit: usize,
    pub recent_analyses_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            chat_context_limit: DEFAULT_CHAT_CONTEXT_LIMIT,
            recent_analyses_limit: MAX_RECENT_ANALYSES,
        }
    }
}

/// Cross-origin configuration for browser clients
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub history: HistoryConfig,
    pub cors: CorsConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            history: HistoryConfig::default(),
            cors: CorsConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        let mut llm = file.llm;
        if let Ok(model) = std::env::var(ENV_ANALYSIS_MODEL) {
            llm.analysis_model = model;
        }
        if let Ok(model) = std::env::var(ENV_CHAT_MODEL) {
            llm.chat_model = model;
        }

        Self {
            llm,
            history: file.history.normalized(),
            cors: file.cors,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents, path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(contents: &str, path: &Path) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl HistoryConfig {
    /// Clamp limits to the supported range
    fn normalized(self) -> Self {
        Self {
            chat_context_limit: self.chat_context_limit.max(1),
            recent_analyses_limit: self.recent_analyses_limit.clamp(1, MAX_RECENT_ANALYSES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let yaml = r#"
llm:
  chat_temperature: 0.5
history:
  recent_analyses_limit: 50
"#;
        let file = Config::parse_config(yaml, Path::new("config.yaml")).unwrap();

        assert_eq!(file.llm.chat_temperature, 0.5);
        assert_eq!(file.llm.analysis_temperature, DEFAULT_ANALYSIS_TEMPERATURE);
        assert_eq!(file.llm.analysis_model, DEFAULT_MODEL);
        assert_eq!(file.history.chat_context_limit, DEFAULT_CHAT_CONTEXT_LIMIT);

        let history = file.history.normalized();
        assert_eq!(history.recent_analyses_limit, MAX_RECENT_ANALYSES);
        assert!(file.cors.allows_any_origin());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = Config::parse_config("   \n", Path::new("config.yaml")).unwrap();
        assert_eq!(file.history.chat_context_limit, 20);
        assert_eq!(file.llm.chat_temperature, DEFAULT_CHAT_TEMPERATURE);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Config::parse_config("llm: [1, 2", Path::new("config.yaml")).is_none());
    }

    #[test]
    fn test_explicit_origins() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://docs.example.com".to_string()],
        };
        assert!(!cors.allows_any_origin());
    }
}
