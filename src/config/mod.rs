//! Application configuration module
//!
//! Handles environment variables and application-wide constants.

mod constants;
mod expiry;
mod settings;

use thiserror::Error;

pub use constants::*;
pub use expiry::TokenExpiry;
pub use settings::{Config, TokenConfig};

/// Configuration problems detected at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    MissingVar(&'static str),

    #[error("JWT_SECRET_KEY must be at least {0} characters long")]
    WeakSecret(usize),

    #[error("invalid JWT_EXPIRES_IN value: {0:?}")]
    InvalidExpiry(String),

    #[error("invalid SERVER_PORT value: {0:?}")]
    InvalidPort(String),
}
