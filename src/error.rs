use crate::{config::ConfigError, num::RangeError, signing::SigningError};

/// Any failure of the SDK surface.
///
/// Each variant wraps the error of one concern, so callers can report the
/// kind separately from the message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Error taxonomy name for structured reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ErrorKind {
    RangeError,
    SigningError,
    ConfigError,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Range(_) => ErrorKind::RangeError,
            Self::Signing(_) => ErrorKind::SigningError,
            Self::Config(_) => ErrorKind::ConfigError,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::RangeError => "RangeError",
            Self::SigningError => "SigningError",
            Self::ConfigError => "ConfigError",
        })
    }
}
