use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_CONFIG_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub poll_interval: Duration,
    /// Per-request timeout. `None` lets a status request wait indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Defaults, then the flat string table in `path` (if readable), then env.
pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_overrides(&mut settings, |key| file_cfg.get(key).cloned());
        }
    }

    if let Ok(v) = std::env::var("SWIFTMAQ_SERVER_URL") {
        settings.server_url = normalize_server_url(&v);
    }
    apply_overrides(&mut settings, |key| {
        std::env::var(format!("APP__{}", key.to_ascii_uppercase())).ok()
    });

    settings
}

fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("server_url") {
        settings.server_url = normalize_server_url(&v);
    }
    if let Some(secs) = lookup("poll_interval_secs").and_then(|v| v.trim().parse::<u64>().ok()) {
        if secs > 0 {
            settings.poll_interval = Duration::from_secs(secs);
        }
    }
    if let Some(secs) = lookup("request_timeout_secs").and_then(|v| v.trim().parse::<u64>().ok()) {
        settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
}

pub fn normalize_server_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_SERVER_URL.to_string();
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    with_scheme.trim_end_matches('/').to_string()
}

pub fn parse_server_url(raw: &str) -> Result<Url> {
    let normalized = normalize_server_url(raw);
    let url = Url::parse(&normalized)
        .with_context(|| format!("invalid server url '{normalized}'"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("server url '{normalized}' cannot be used as a base url");
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
