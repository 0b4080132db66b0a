//! Uniform error type for every remote service call.

use crate::error::ErrorKind;

/// HTTP status the backend returns for oversized uploads.
pub(crate) const HTTP_STATUS_PAYLOAD_TOO_LARGE: u16 = 413;

/// Errors that can occur while talking to a remote service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error text from the response body
        message: String,
    },

    #[error("Image too large (HTTP 413). Try a smaller image.")]
    PayloadTooLarge,

    #[error("{0}")]
    NoResult(String),

    #[error("API key not configured")]
    MissingApiKey,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Invalid audio payload: {0}")]
    InvalidAudio(#[from] base64::DecodeError),

    #[error("Could not prepare image: {0}")]
    Image(#[from] crate::preprocess::PreprocessError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Http(_) | ServiceError::Rejected { .. } => ErrorKind::NetworkFailure,
            ServiceError::PayloadTooLarge => ErrorKind::TooLarge,
            ServiceError::NoResult(_) | ServiceError::InvalidAudio(_) => ErrorKind::NoResult,
            ServiceError::MissingApiKey => ErrorKind::Config,
            ServiceError::InvalidRequest(_) | ServiceError::Image(_) => ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ServiceError::MissingApiKey.to_string(), "API key not configured");
        assert_eq!(
            ServiceError::Rejected {
                status: 500,
                message: "boom".to_string()
            }
            .to_string(),
            "Server error (HTTP 500): boom"
        );
        assert_eq!(
            ServiceError::NoResult("No prediction returned.".to_string()).to_string(),
            "No prediction returned."
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            ServiceError::Rejected {
                status: 503,
                message: String::new()
            }
            .kind(),
            ErrorKind::NetworkFailure
        );
        assert_eq!(ServiceError::PayloadTooLarge.kind(), ErrorKind::TooLarge);
        assert_eq!(
            ServiceError::NoResult(String::new()).kind(),
            ErrorKind::NoResult
        );
    }
}
