use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod session_store;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use session_store::load_session;
pub use settings::{ApiConfig, Config, ConfigOverrides, LoggingConfig, SessionConfig};

/// Prefix for environment overrides, e.g. `TICKETDESK__API__BASE_URL`.
pub const ENV_PREFIX: &str = "TICKETDESK";

/// Loads the application configuration.
///
/// Reads the TOML file at `path` if it exists, then layers `TICKETDESK__*`
/// environment variables on top, deserializes into our strongly-typed
/// `Config` and validates it.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // The file is optional; every setting has a default.
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Checks the settings that would otherwise only fail at request time.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::ValidationError("api.base_url must not be empty".to_string()));
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must start with http:// or https://, got '{}'",
            base_url
        )));
    }
    if config.api.timeout.is_zero() {
        return Err(ConfigError::ValidationError("api.timeout must be greater than zero".to_string()));
    }
    Ok(())
}
