//! Layered configuration for Atelier.
//!
//! Sources, lowest precedence first:
//! - bundled defaults (`atelier.toml` shipped with the library)
//! - `~/.config/atelier/atelier.toml`
//! - `./atelier.toml`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use atelier_core::{NodeKind, PollingConfig};
use atelier_error::{AtelierResult, ConfigError};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../atelier.toml");

/// Where the generation endpoint lives.
///
/// ```toml
/// [endpoint]
/// base_url = "https://project.example.co"
/// generate_path = "functions/v1/fal"
/// poll_path = "functions/v1/fal-poll"
/// request_timeout_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Base URL of the backend
    pub base_url: String,

    /// Path of the submit function, relative to `base_url`
    #[serde(default = "default_generate_path")]
    pub generate_path: String,

    /// Path of the status function, relative to `base_url`
    #[serde(default = "default_poll_path")]
    pub poll_path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_generate_path() -> String {
    "functions/v1/fal".to_string()
}

fn default_poll_path() -> String {
    "functions/v1/fal-poll".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl EndpointConfig {
    /// Full URL of the submit function.
    pub fn generate_url(&self) -> String {
        join_url(&self.base_url, &self.generate_path)
    }

    /// Full URL of the status function.
    pub fn poll_url(&self) -> String {
        join_url(&self.base_url, &self.poll_path)
    }

    /// Request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Per-kind default model overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ModelDefaults {
    /// Model for text nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Model for image nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Model for video nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

impl ModelDefaults {
    /// Model to use for `kind`, falling back to the built-in default.
    pub fn model_for(&self, kind: NodeKind) -> String {
        let configured = match kind {
            NodeKind::Text => self.text.as_deref(),
            NodeKind::Image => self.image.as_deref(),
            NodeKind::Video => self.video.as_deref(),
        };
        configured
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| kind.default_model())
            .to_string()
    }
}

/// Top-level Atelier configuration.
///
/// # Example
///
/// ```no_run
/// use atelier_config::AtelierConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AtelierConfig::load()?;
/// println!("Submitting to {}", config.endpoint.generate_url());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AtelierConfig {
    /// Endpoint location
    pub endpoint: EndpointConfig,

    /// Polling limits
    #[serde(default)]
    pub polling: PollingConfig,

    /// Default model overrides
    #[serde(default)]
    pub models: ModelDefaults,
}

impl AtelierConfig {
    /// Load configuration from a single file, without the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> AtelierResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: current dir > home dir > bundled.
    ///
    /// Missing user files are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file is malformed or the merged result
    /// fails validation.
    #[instrument]
    pub fn load() -> AtelierResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/atelier/atelier.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("atelier").required(false));

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// The bundled defaults alone.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled file is malformed.
    pub fn bundled() -> AtelierResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty base URL or zero polling attempts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("endpoint.base_url", "must not be empty"));
        }
        self.polling
            .validate()
            .map_err(|reason| ConfigError::invalid("polling", reason))
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize configuration: {}", e)))
    }
}
