//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `VALUECHARTS` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use valuecharts::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.telemetry.init().expect("Failed to start logging");
//! ```

mod error;
mod interaction;
mod telemetry;
mod view;

pub use error::{ConfigError, ValidationError};
pub use interaction::InteractionConfig;
pub use telemetry::TelemetryConfig;
pub use view::ViewConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Layout and display options
    #[serde(default)]
    pub view: ViewConfig,

    /// Enabled gestures
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Logging output
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `VALUECHARTS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `VALUECHARTS__VIEW__ORIENTATION=horizontal` -> `view.orientation`
    /// - `VALUECHARTS__INTERACTION__SORT_MODE=manual` -> `interaction.sort_mode`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VALUECHARTS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for non-positive chart sizes or a
    /// malformed log filter.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.view.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
