use crate::application::history_store::DEFAULT_HISTORY_KEY;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiSettings {
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub analysis_model: String,
    pub chat_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub backend: StorageBackend,
    pub storage_dir: PathBuf,
    pub storage_key: String,
    /// Largest history payload the backend accepts, in bytes
    #[serde(default)]
    pub quota_bytes: Option<usize>,
}

fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.bind_addr", "127.0.0.1:8080")?
        .set_default("server.max_upload_bytes", 10 * 1024 * 1024)?
        .set_default("gemini.api_base", "https://generativelanguage.googleapis.com/v1beta")?
        .set_default("gemini.analysis_model", "gemini-2.5-flash")?
        .set_default("gemini.chat_model", "gemini-2.5-flash")?
        .set_default("gemini.timeout_secs", 60)?
        .set_default("history.backend", "file")?
        .set_default("history.storage_dir", "data")?
        .set_default("history.storage_key", DEFAULT_HISTORY_KEY)
}

/// Load `config/app.toml` (optional) with `PCB__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder_with_defaults()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("PCB").separator("__"))
        .build()?;

    let mut app_config: AppConfig = settings.try_deserialize()?;
    app_config.gemini.api_key = resolve_api_key(app_config.gemini.api_key.take(), api_key_from_env);
    Ok(app_config)
}

/// A blank configured key counts as unset.
fn resolve_api_key(
    configured: Option<String>,
    fallback: impl FnOnce() -> Option<String>,
) -> Option<String> {
    configured
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .or_else(fallback)
}

fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
