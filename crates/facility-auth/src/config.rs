//! Authorization configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tablet identifier reported to card readers until tablets are registered.
pub const DEFAULT_TABLET_IDENTIFIER: &str = "abc123";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Configuration for the authorization crates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthzConfig {
    /// Secure-room card reader API settings.
    pub secure_rooms_api: SecureRoomsApiConfig,
}

impl AuthzConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SECURE_ROOMS_API_BASIC_AUTH_NAME`: basic-auth user for card readers
    /// - `SECURE_ROOMS_API_BASIC_AUTH_PASSWORD`: basic-auth password for card readers
    /// - `SECURE_ROOMS_TABLET_IDENTIFIER`: tablet identifier sent with account choices (default: abc123)
    pub fn from_env() -> Self {
        Self {
            secure_rooms_api: SecureRoomsApiConfig::from_env(),
        }
    }

    /// Validate that all required configuration is present for production.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.secure_rooms_api.validate()
    }
}

/// Secure-room card reader API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecureRoomsApiConfig {
    /// Basic-auth user name card readers authenticate with.
    pub basic_auth_name: Option<String>,

    /// Basic-auth password card readers authenticate with.
    pub basic_auth_password: Option<String>,

    /// Tablet identifier sent back with account choices.
    pub tablet_identifier: String,
}

impl Default for SecureRoomsApiConfig {
    fn default() -> Self {
        Self {
            basic_auth_name: None,
            basic_auth_password: None,
            tablet_identifier: DEFAULT_TABLET_IDENTIFIER.to_string(),
        }
    }
}

impl SecureRoomsApiConfig {
    /// Load settings from environment variables.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            basic_auth_name: std::env::var("SECURE_ROOMS_API_BASIC_AUTH_NAME").ok(),
            basic_auth_password: std::env::var("SECURE_ROOMS_API_BASIC_AUTH_PASSWORD").ok(),
            tablet_identifier: std::env::var("SECURE_ROOMS_TABLET_IDENTIFIER")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(default.tablet_identifier),
        }
    }

    /// Settings with basic-auth credentials.
    pub fn with_credentials(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            basic_auth_name: Some(name.into()),
            basic_auth_password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Both credentials, if configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.basic_auth_name, &self.basic_auth_password) {
            (Some(name), Some(password)) => Some((name.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Fail when the basic-auth credentials are missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.basic_auth_name.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "SECURE_ROOMS_API_BASIC_AUTH_NAME".to_string(),
            ));
        }
        if self.basic_auth_password.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "SECURE_ROOMS_API_BASIC_AUTH_PASSWORD".to_string(),
            ));
        }
        Ok(())
    }
}
