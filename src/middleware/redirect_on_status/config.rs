//! Configuration surface and its validation errors.

use serde::Deserialize;
use thiserror::Error;

use crate::range::ParseError;

/// Settings for one [`RedirectOnStatus`](super::RedirectOnStatus) instance.
///
/// Keys are camelCase in config files:
///
/// ```toml
/// redirectUri  = "/maintenance"
/// redirectCode = 307
/// status       = ["502", "504"]
/// method       = ["GET", "HEAD"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Target of the `Location` header. Required.
    #[serde(alias = "redirectURI")]
    pub redirect_uri: String,
    /// `302`, `303` or `307`. Defaults to `307`.
    pub redirect_code: u16,
    /// Triggering status ranges, `"n"` or `"low-high"`. Required.
    pub status: Vec<String>,
    /// Methods eligible for interception. Empty means every method.
    pub method: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redirect_uri: String::new(),
            redirect_code: 307,
            status: Vec::new(),
            method: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

/// Why a middleware refused its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("uri cannot be empty")]
    EmptyUri,

    #[error("redirectCode cannot be empty")]
    MissingRedirectCode,

    /// Anything but `302`, `303` or `307`.
    #[error("redirectCode must be a temporary redirection code, got {0}")]
    NotTemporary(u16),

    #[error("code cannot be empty")]
    EmptyStatus,

    #[error(transparent)]
    Range(#[from] ParseError),

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),
}
