//! Unified error type.

use thiserror::Error;

use crate::middleware::redirect_on_status::ConfigError;

/// The error type returned by tsu's fallible infrastructure operations.
///
/// Application-level outcomes (404, a redirect, etc.) are written to the
/// response sink, not returned as `Error`s. This type surfaces failures that
/// stop a service from starting: binding a port, accepting connections, or
/// a middleware that refuses its configuration.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{0}`")]
    Addr(String),

    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
