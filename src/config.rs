//! Client configuration loading: remote authority address and timing knobs.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the client looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/display.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_DISPLAY_CONFIG_PATH";
/// Environment variable carrying the base address of the remote authority.
const API_BASE_URL_ENV: &str = "QUIZ_API_BASE_URL";
/// Origin used when no base address is configured.
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:3000";
/// Delay between two poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_500);
/// Length of the celebration window after a successful scoring command.
pub const DEFAULT_CELEBRATION: Duration = Duration::from_millis(900);
/// Per-request timeout applied by the HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration, resolved once at startup.
pub struct AppConfig {
    api_base_url: Option<String>,
    poll_interval: Duration,
    celebration: Duration,
    request_timeout: Duration,
}

impl AppConfig {
    /// Load the configuration from disk and the environment, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let raw = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded display config");
                    raw
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    RawConfig::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                RawConfig::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                RawConfig::default()
            }
        };

        Self::from_raw(raw, env::var(API_BASE_URL_ENV).ok())
    }

    /// Address every request is rooted at: the configured base or [`DEFAULT_ORIGIN`].
    pub fn base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_ORIGIN)
    }

    /// Whether a base address was explicitly configured.
    pub fn has_explicit_base(&self) -> bool {
        self.api_base_url.is_some()
    }

    /// Delay between two poll cycles.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Length of the celebration window.
    pub fn celebration(&self) -> Duration {
        self.celebration
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn from_raw(raw: RawConfig, env_base: Option<String>) -> Self {
        let api_base_url = normalize_base(env_base).or_else(|| normalize_base(raw.api_base_url));
        Self {
            api_base_url,
            poll_interval: raw
                .poll_interval_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            celebration: raw
                .celebration_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_CELEBRATION),
            request_timeout: raw
                .request_timeout_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default(), None)
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    api_base_url: Option<String>,
    poll_interval_ms: Option<u64>,
    celebration_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
}

/// Trim trailing separators and treat blank values as absent.
fn normalize_base(value: Option<String>) -> Option<String> {
    value
        .map(|base| base.trim().trim_end_matches('/').to_string())
        .filter(|base| !base.is_empty())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
