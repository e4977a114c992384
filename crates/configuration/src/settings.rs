use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the ticketing backend lives and how long to wait for it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme, host and port of the backend, e.g. `https://tickets.example.com`.
    /// Endpoint paths (`/api/organizers/...`) are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. A hung request is reported as a network failure
    /// once this elapses.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

/// Location of the stored session (token plus signed-in user).
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_file_name")]
    pub file_name: String,
}

/// Command-line overrides layered on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConfigOverrides {
    /// Override the backend base URL.
    #[cfg_attr(feature = "clap", arg(long))]
    pub base_url: Option<String>,

    /// Override the session file location.
    #[cfg_attr(feature = "clap", arg(long))]
    pub session: Option<PathBuf>,

    /// Override the log filter (e.g. "debug", "analytics=trace").
    #[cfg_attr(feature = "clap", arg(long))]
    pub log_level: Option<String>,
}

impl Config {
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(base_url) = &overrides.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(path) = &overrides.session {
            self.session.path = path.clone();
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level.clone();
        }
    }
}

// --- Default Implementations ---
// A missing config.toml (or a missing section in it) falls back to these.

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_session_path() -> PathBuf {
    PathBuf::from("session.json")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file_name() -> String {
    "ticketdesk.log".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            file_name: default_log_file_name(),
        }
    }
}
