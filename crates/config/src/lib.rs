use std::env;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Remote endpoints for the chat-completion gateway and the hospital
/// directory.  The API key is never written to the config file; it comes
/// from the environment variable named by `api_key_env` (or a `.env`
/// loaded by the CLI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Chat-completion endpoint URL (Gemini `generateContent` shape).
    pub api_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Base URL of the hospital-directory backend.
    pub backend_url: String,
    /// Per-request timeout in seconds for the chat-completion call.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url:
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
                    .to_string(),
            api_key_env: "UPCHAARAK_API_KEY".to_string(),
            backend_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the key-value store file.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: ".upchaarak/data.redb".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    /// Environment variables `UPCHAARAK_API_URL` and `UPCHAARAK_BACKEND_URL`
    /// take precedence over the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)?;
        }

        if let Ok(url) = env::var("UPCHAARAK_API_URL") {
            if !url.is_empty() {
                config.gateway.api_url = url;
            }
        }
        if let Ok(url) = env::var("UPCHAARAK_BACKEND_URL") {
            if !url.is_empty() {
                config.gateway.backend_url = url;
            }
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.gateway.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
