use std::env;
use std::time::Duration;

use crate::defaults::SimulationDefaults;
use crate::error::SimError;

const DEFAULT_LLM_MODEL: &str = "claude-haiku-4-5-20251001";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 10;

/// Which parameter extractor the service runs with. Chosen once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractorBackend {
    /// In-process keyword matching.
    Keyword,
    /// Anthropic Messages API.
    Claude { api_key: String, model: String },
}

/// Application configuration loaded from environment variables.
///
/// Built once in `main` and shared read-only; nothing mutates it after startup.
#[derive(Debug, Clone)]
pub struct Config {
    // Service metadata
    pub api_title: String,
    pub api_version: String,
    pub api_description: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Extraction
    pub extractor: ExtractorBackend,
    pub extraction_timeout: Duration,

    pub defaults: SimulationDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_title: "Simulation Chatbot API".to_string(),
            api_version: "1.0.0".to_string(),
            api_description: "CPU Architecture & Semiconductor Fab Simulation Chatbot".to_string(),
            web_host: "0.0.0.0".to_string(),
            web_port: 8000,
            extractor: ExtractorBackend::Keyword,
            extraction_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            defaults: SimulationDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, SimError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build a config from an arbitrary variable source. Unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SimError> {
        let base = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let web_port = match var("WEB_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| SimError::Config(format!("WEB_PORT must be a port number, got {port}")))?,
            None => base.web_port,
        };

        let extraction_timeout = match var("LLM_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(secs.parse().map_err(|_| {
                SimError::Config(format!("LLM_TIMEOUT_SECS must be a whole number, got {secs}"))
            })?),
            None => base.extraction_timeout,
        };

        let extractor = match var("LLM_PROVIDER").map(|p| p.to_lowercase()).as_deref() {
            None | Some("none") | Some("keyword") => ExtractorBackend::Keyword,
            Some("anthropic") | Some("claude") => {
                let api_key = var("LLM_API_KEY")
                    .or_else(|| var("ANTHROPIC_API_KEY"))
                    .ok_or_else(|| {
                        SimError::Config(
                            "LLM_API_KEY or ANTHROPIC_API_KEY is required when LLM_PROVIDER is anthropic"
                                .to_string(),
                        )
                    })?;
                ExtractorBackend::Claude {
                    api_key,
                    model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                }
            }
            Some(other) => {
                return Err(SimError::Config(format!("unsupported LLM_PROVIDER: {other}")));
            }
        };

        Ok(Self {
            api_title: var("API_TITLE").unwrap_or(base.api_title),
            api_version: var("API_VERSION").unwrap_or(base.api_version),
            api_description: var("API_DESCRIPTION").unwrap_or(base.api_description),
            web_host: var("WEB_HOST").unwrap_or(base.web_host),
            web_port,
            extractor,
            extraction_timeout,
            defaults: base.defaults,
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}...({} chars)", val.get(..n).unwrap_or_default(), val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  WEB: {}:{}", self.web_host, self.web_port);
        match &self.extractor {
            ExtractorBackend::Keyword => tracing::info!("  LLM_PROVIDER: <not set> (keyword extraction)"),
            ExtractorBackend::Claude { api_key, model } => {
                tracing::info!("  LLM_PROVIDER: anthropic ({model})");
                tracing::info!("  LLM_API_KEY: {}", preview(api_key));
            }
        }
    }
}
