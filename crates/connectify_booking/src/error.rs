// --- File: crates/connectify_booking/src/error.rs ---
use connectify_common::{external_service_error, validation_error, ConnectifyError};
use std::fmt;
use thiserror::Error;

/// Coarse classification of a failed call to the token service.
///
/// The page only ever shows a generic error, but the kind is kept for the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a response (DNS, connect, TLS, timeout, ...)
    Network,
    /// The service answered with a non-success status
    Status(u16),
    /// The response body was not the expected JSON
    Parse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Status(code) => write!(f, "status {}", code),
            FailureKind::Parse => write!(f, "malformed response"),
        }
    }
}

/// Errors returned by the token service.
#[derive(Error, Debug)]
pub enum TokenServiceError {
    /// Error occurred while sending the request or reading the response
    #[error("Token service request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the token service
    #[error("Token service returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing the token service response
    #[error("Failed to parse token service response: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl TokenServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TokenServiceError::RequestError(e) if e.is_decode() => FailureKind::Parse,
            TokenServiceError::RequestError(e) => match e.status() {
                Some(status) => FailureKind::Status(status.as_u16()),
                None => FailureKind::Network,
            },
            TokenServiceError::ApiError { status_code, .. } => FailureKind::Status(*status_code),
            TokenServiceError::ParseError(_) => FailureKind::Parse,
        }
    }
}

/// Booking page errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The page URL carries no token
    #[error("No booking token in the page URL")]
    MissingCredential,

    /// The token is not 64 hex characters
    #[error("Malformed booking token ({length} characters)")]
    MalformedCredential { length: usize },

    /// The validation call failed before a verdict was reached
    #[error("Token validation failed: {0}")]
    RemoteValidation(FailureKind),

    /// The validation service answered `valid: false`
    #[error("Token rejected by the validation service")]
    TokenRejected,

    /// Marking the token as used failed
    #[error("Failed to mark token as used: {0}")]
    RemoteCompletion(FailureKind),

    /// The scheduling widget library never became available
    #[error("Scheduling widget library unavailable after {attempts} polls")]
    WidgetUnavailable { attempts: u32 },

    /// Missing or invalid configuration
    #[error("Booking configuration error: {0}")]
    ConfigError(String),
}

/// Convert BookingError to ConnectifyError
impl From<BookingError> for ConnectifyError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingCredential | BookingError::MalformedCredential { .. } => {
                validation_error(err)
            }
            BookingError::RemoteValidation(kind) => {
                external_service_error("Token validation", kind)
            }
            BookingError::TokenRejected => validation_error(err),
            BookingError::RemoteCompletion(kind) => external_service_error("Token completion", kind),
            BookingError::WidgetUnavailable { .. } => ConnectifyError::TimeoutError(err.to_string()),
            BookingError::ConfigError(msg) => ConnectifyError::ConfigError(msg),
        }
    }
}
