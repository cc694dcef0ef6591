use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use shared::domain::ActingUserId;
use tracing::{debug, warn};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "preregistro.toml";
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ACTING_USER_ID: &str = "1";

/// Startup configuration for the submission client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Backend base URL, validated and stored without a trailing slash.
    pub endpoint: String,
    pub acting_user_id: ActingUserId,
    /// Unset means no client-side timeout.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            acting_user_id: ActingUserId(DEFAULT_ACTING_USER_ID.into()),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Sets `secs` as the request timeout unless one was configured explicitly.
    pub fn with_fallback_timeout(mut self, secs: u64) -> Self {
        if self.request_timeout_secs.is_none() {
            self.request_timeout_secs = Some(secs);
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    endpoint: Option<String>,
    #[serde(alias = "actingUserId")]
    acting_user_id: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub acting_user_id: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Resolves settings from defaults, the config file, the process environment, and
/// `overrides`, in that order.
pub fn load_settings(
    config_path: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<Settings, ConfigError> {
    load_settings_with(config_path, overrides, |name| std::env::var(name).ok())
}

pub fn load_settings_with(
    config_path: Option<&Path>,
    overrides: &SettingsOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();
    let mut endpoint = settings.endpoint.clone();
    let mut acting_user_id = settings.acting_user_id.0.clone();

    if let Some(file_cfg) = read_config_file(config_path)? {
        if let Some(v) = file_cfg.endpoint {
            endpoint = v;
        }
        if let Some(v) = file_cfg.acting_user_id {
            acting_user_id = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = Some(v);
        }
    }

    if let Some(v) = env("PREREGISTRO_ENDPOINT") {
        endpoint = v;
    }
    if let Some(v) = env("APP__ENDPOINT") {
        endpoint = v;
    }

    if let Some(v) = env("PREREGISTRO_USER_ID") {
        acting_user_id = v;
    }
    if let Some(v) = env("APP__ACTING_USER_ID") {
        acting_user_id = v;
    }

    for name in ["PREREGISTRO_TIMEOUT_SECS", "APP__REQUEST_TIMEOUT_SECS"] {
        if let Some(v) = env(name) {
            match v.trim().parse::<u64>() {
                Ok(parsed) => settings.request_timeout_secs = Some(parsed),
                Err(_) => warn!(variable = name, value = %v, "ignoring non-numeric timeout"),
            }
        }
    }

    if let Some(v) = &overrides.endpoint {
        endpoint = v.clone();
    }
    if let Some(v) = &overrides.acting_user_id {
        acting_user_id = v.clone();
    }
    if let Some(v) = overrides.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }

    settings.endpoint = normalize_endpoint(&endpoint)?;
    let acting_user_id = acting_user_id.trim();
    if acting_user_id.is_empty() {
        return Err(ConfigError::EmptyUserId);
    }
    settings.acting_user_id = ActingUserId(acting_user_id.to_string());

    debug!(endpoint = %settings.endpoint, user_id = %settings.acting_user_id, "resolved settings");
    Ok(settings)
}

fn read_config_file(config_path: Option<&Path>) -> Result<Option<FileSettings>, ConfigError> {
    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    toml::from_str::<FileSettings>(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse { path, source })
}

pub(crate) fn normalize_endpoint(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        value: raw.to_string(),
        reason,
    };

    let url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
