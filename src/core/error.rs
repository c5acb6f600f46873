use thiserror::Error;

use crate::core::types::PatternId;

#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Coin index {index} out of range (coin count {count})")]
    OutOfRange { index: usize, count: usize },

    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("Pattern not available: {0}")]
    PatternNotAvailable(PatternId),

    #[error("Invalid application: {0}")]
    InvalidApplication(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Fieldless mirror of [`CombatError`] for matching and log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfRange,
    IllegalAction,
    PatternNotAvailable,
    InvalidApplication,
    ConfigurationError,
    Io,
    Toml,
}

impl CombatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CombatError::OutOfRange { .. } => ErrorKind::OutOfRange,
            CombatError::IllegalAction(_) => ErrorKind::IllegalAction,
            CombatError::PatternNotAvailable(_) => ErrorKind::PatternNotAvailable,
            CombatError::InvalidApplication(_) => ErrorKind::InvalidApplication,
            CombatError::ConfigurationError(_) => ErrorKind::ConfigurationError,
            CombatError::Io(_) => ErrorKind::Io,
            CombatError::Toml(_) => ErrorKind::Toml,
        }
    }

    pub(crate) fn illegal(msg: impl Into<String>) -> Self {
        CombatError::IllegalAction(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        CombatError::ConfigurationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CombatError>;
