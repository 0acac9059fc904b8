//! Application-level configuration loading: backend location, notification pacing and display defaults.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::Preferences;

/// Default location on disk where the relay looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/relay.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_RELAY_CONFIG_PATH";
/// Environment variable that overrides the backend base URL.
const API_URL_ENV: &str = "SCOREBOARD_API_URL";
const DEFAULT_API_URL: &str = "http://localhost/api/";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Minimum spacing between two notifications shown on the dashboards.
const DEFAULT_NOTIFICATION_INTERVAL: Duration = Duration::from_millis(12_000);

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub notification_interval: Duration,
    /// Initial display preferences, adjustable at runtime.
    pub preferences: Preferences,
}

impl AppConfig {
    /// Load the configuration from disk and the environment, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded relay config");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env::var(API_URL_ENV).ok().filter(|url| !url.is_empty()) {
            info!(url = %url, "scoreboard API URL taken from environment");
            self.api_base_url = url;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            notification_interval: DEFAULT_NOTIFICATION_INTERVAL,
            preferences: Preferences::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    api_url: Option<String>,
    request_timeout_ms: Option<u64>,
    notification_interval_ms: Option<u64>,
    #[serde(default)]
    display: RawDisplay,
}

#[derive(Debug, Default, Deserialize)]
/// Optional overrides of the default [`Preferences`].
struct RawDisplay {
    show_history: Option<bool>,
    show_only_sums: Option<bool>,
    show_images: Option<bool>,
    show_notifications: Option<bool>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let prefs = defaults.preferences;
        Self {
            api_base_url: value.api_url.unwrap_or(defaults.api_base_url),
            request_timeout: value
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            notification_interval: value
                .notification_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.notification_interval),
            preferences: Preferences {
                show_history: value.display.show_history.unwrap_or(prefs.show_history),
                show_only_sums: value.display.show_only_sums.unwrap_or(prefs.show_only_sums),
                show_images: value.display.show_images.unwrap_or(prefs.show_images),
                show_notifications: value
                    .display
                    .show_notifications
                    .unwrap_or(prefs.show_notifications),
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
