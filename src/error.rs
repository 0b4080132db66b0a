//! Crate-wide error type and the taxonomy every module maps into.

use std::fmt;

use crate::camera::CaptureError;
use crate::config::ConfigError;
use crate::input::InputError;
use crate::preprocess::PreprocessError;
use crate::services::ServiceError;
use crate::settings::SettingsError;

/// What went wrong, independent of which module noticed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Camera access refused
    PermissionDenied,
    /// No usable camera
    DeviceUnavailable,
    /// Operation invalid in the current capture state
    NotActive,
    /// Unsupported or undecodable input
    InvalidInput,
    /// Input exceeds the size bound
    TooLarge,
    /// Remote call rejected or unreachable
    NetworkFailure,
    /// Remote call succeeded but returned nothing usable
    NoResult,
    /// Local file or store access failed
    Io,
    /// Configuration could not be loaded
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::DeviceUnavailable => "device unavailable",
            ErrorKind::NotActive => "not active",
            ErrorKind::InvalidInput => "invalid input",
            ErrorKind::TooLarge => "too large",
            ErrorKind::NetworkFailure => "network failure",
            ErrorKind::NoResult => "no result",
            ErrorKind::Io => "io",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

/// Any error surfaced by a signlens flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Capture(e) => e.kind(),
            Error::Input(e) => e.kind(),
            Error::Preprocess(e) => e.kind(),
            Error::Service(e) => e.kind(),
            Error::Settings(e) => e.kind(),
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_source() {
        let err: Error = CaptureError::NotActive.into();
        assert_eq!(err.kind(), ErrorKind::NotActive);
        assert_eq!(err.to_string(), "Camera is not active");

        let err: Error = InputError::TooLarge {
            size: 20,
            limit: 10,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::TooLarge);

        let err: Error = ServiceError::NoResult("empty".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::NoResult);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::NetworkFailure.to_string(), "network failure");
        assert_eq!(ErrorKind::InvalidInput.to_string(), "invalid input");
    }
}
