//! config.rs — runtime configuration loaded from `config/trends.json`.
//!
//! The API key may be given literally or as the sentinel `"ENV"`, which
//! resolves `GEMINI_API_KEY` at load time. A missing config file is not an
//! error; defaults apply and the key is read from the environment.

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/trends.json";

fn default_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_api_key() -> String {
    "ENV".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsConfig {
    /// Gemini model identifier used for every acquisition.
    #[serde(default = "default_model")]
    pub model: String,
    /// Literal key, or "ENV" to read GEMINI_API_KEY.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Directory holding the report and date-key slots.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: default_api_key(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl TrendsConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file is missing or unreadable. The `"ENV"` sentinel is resolved
    /// here; resolution failure is deferred until a real client is built,
    /// so mock/test runs never need a key.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let mut cfg: TrendsConfig = match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "invalid trends config, using defaults");
                TrendsConfig::default()
            }),
            Err(_) => TrendsConfig::default(),
        };

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        }
        cfg
    }
}
