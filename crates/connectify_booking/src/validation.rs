// --- File: crates/connectify_booking/src/validation.rs ---
use connectify_common::{TokenService, ValidationResult};
use std::sync::Arc;
use tracing::{info, warn};

use crate::credential::Credential;
use crate::error::{BookingError, TokenServiceError};

/// Single-attempt validation of a well-formed token against the token service.
pub struct ValidationClient<S> {
    service: Arc<S>,
}

impl<S> ValidationClient<S>
where
    S: TokenService<Error = TokenServiceError>,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Validates the token, keeping the failure kind when no verdict was reached.
    ///
    /// `Ok` carries the service verdict, which may still be `valid: false`.
    pub async fn validate_detailed(
        &self,
        credential: &Credential,
    ) -> Result<ValidationResult, BookingError> {
        self.service
            .validate_token(credential.as_str())
            .await
            .map_err(|e| {
                warn!("Token validation for {} failed: {}", credential, e);
                BookingError::RemoteValidation(e.kind())
            })
    }

    /// Validates the token; every failure collapses to `valid: false`.
    ///
    /// A negative verdict never carries identity hints.
    pub async fn validate(&self, credential: &Credential) -> ValidationResult {
        match self.validate_detailed(credential).await {
            Ok(result) if result.valid => result,
            Ok(_) => {
                info!("Token {} rejected by the validation service", credential);
                ValidationResult::invalid()
            }
            // Already logged by `validate_detailed`.
            Err(_) => ValidationResult::invalid(),
        }
    }
}
