// --- File: crates/connectify_booking/src/completion.rs ---
use connectify_common::TokenService;
use std::mem;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn, Instrument};

use crate::credential::Credential;
use crate::error::{BookingError, TokenServiceError};

/// Best-effort reporting of a finished booking to the token service.
///
/// Reports are fire-and-forget: the caller never waits for them and failures
/// are only logged. Failed reports are not retried.
pub struct CompletionReporter<S> {
    service: Arc<S>,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl<S> Clone for CompletionReporter<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<S> CompletionReporter<S>
where
    S: TokenService<Error = TokenServiceError> + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            in_flight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Marks the token as used and waits for the answer.
    pub async fn mark_used(&self, credential: &Credential) -> Result<(), BookingError> {
        self.service
            .mark_token_used(credential.as_str())
            .await
            .map_err(|e| {
                warn!("Mark-used call for {} failed: {}", credential, e);
                BookingError::RemoteCompletion(e.kind())
            })
    }

    /// Spawns a mark-used call and returns immediately.
    pub fn report(&self, credential: &Credential) {
        let reporter = self.clone();
        let credential = credential.clone();
        let handle = tokio::spawn(
            async move {
                match reporter.mark_used(&credential).await {
                    Ok(()) => info!("Token {} marked as used", credential),
                    Err(e) => warn!("Booking completed but token stays redeemable: {}", e),
                }
            }
            .in_current_span(),
        );

        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }

    /// Waits for every report spawned so far.
    pub async fn flush(&self) {
        let handles = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            mem::take(&mut *in_flight)
        };
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Completion report task ended abnormally: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::service::mock::MockTokenService;

    const TOKEN: &str = "abcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcdefabcd";

    #[tokio::test]
    async fn test_report_then_flush_makes_one_call() {
        let service = Arc::new(MockTokenService::accepting(None, None));
        let reporter = CompletionReporter::new(service.clone());
        let credential = Credential::parse(Some(TOKEN)).unwrap();

        reporter.report(&credential);
        reporter.flush().await;

        assert_eq!(service.mark_used_calls(), vec![TOKEN.to_string()]);
    }

    #[tokio::test]
    async fn test_failed_report_is_swallowed() {
        let service = Arc::new(MockTokenService::accepting(None, None).failing_mark_used());
        let reporter = CompletionReporter::new(service.clone());
        let credential = Credential::parse(Some(TOKEN)).unwrap();

        reporter.report(&credential);
        reporter.flush().await;

        assert_eq!(service.mark_used_calls().len(), 1);
        assert_eq!(
            reporter.mark_used(&credential).await,
            Err(BookingError::RemoteCompletion(FailureKind::Status(502)))
        );
    }
}
