// --- File: crates/connectify_booking/src/service.rs ---
use connectify_common::{create_client, join_url, BoxFuture, TokenService, ValidationResult, ACCEPT_JSON};
use connectify_config::ServiceConfig;
use reqwest::{header::ACCEPT, Client, Response};
use tracing::debug;

use crate::error::{BookingError, TokenServiceError};

/// Path of the token validation endpoint.
pub const VALIDATE_PATH: &str = "/api/validate-token";

/// Path of the endpoint that consumes a token after booking.
pub const MARK_USED_PATH: &str = "/api/mark-used";

/// Token service backed by the remote HTTP API.
pub struct HttpTokenService {
    client: Client,
    base_url: String,
}

impl HttpTokenService {
    /// Create a token service talking to `base_url` with the given client.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Create a token service from the `service` config section.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, BookingError> {
        if config.base_url.trim().is_empty() {
            return Err(BookingError::ConfigError(
                "service.base_url must not be empty".to_string(),
            ));
        }
        let client = create_client(config.request_timeout_secs, true)
            .map_err(|e| BookingError::ConfigError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::new(client, config.base_url.trim()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Turns a non-success response into an `ApiError` carrying the body text.
async fn ensure_success(response: Response) -> Result<Response, TokenServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(TokenServiceError::ApiError {
        status_code: status.as_u16(),
        message,
    })
}

impl TokenService for HttpTokenService {
    type Error = TokenServiceError;

    fn validate_token(&self, token: &str) -> BoxFuture<'_, ValidationResult, Self::Error> {
        let token = token.to_string();
        Box::pin(async move {
            let url = join_url(&self.base_url, VALIDATE_PATH);
            debug!("GET {}", url);

            let response = self
                .client
                .get(&url)
                .query(&[("token", token.as_str())])
                .header(ACCEPT, ACCEPT_JSON)
                .send()
                .await?;
            let body = ensure_success(response).await?.text().await?;

            Ok(serde_json::from_str::<ValidationResult>(&body)?)
        })
    }

    fn mark_token_used(&self, token: &str) -> BoxFuture<'_, (), Self::Error> {
        let token = token.to_string();
        Box::pin(async move {
            let url = join_url(&self.base_url, MARK_USED_PATH);
            debug!("POST {}", url);

            let response = self
                .client
                .post(&url)
                .query(&[("token", token.as_str())])
                .header(ACCEPT, ACCEPT_JSON)
                .send()
                .await?;
            // The body carries nothing the page needs.
            ensure_success(response).await?;
            Ok(())
        })
    }
}

/// Mock implementation of TokenService for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// What the mock answers to `validate_token`.
    #[derive(Debug, Clone)]
    pub enum MockReply {
        Result(ValidationResult),
        Status(u16),
        MalformedBody,
    }

    /// Mock token service recording every call.
    pub struct MockTokenService {
        reply: MockReply,
        fail_mark_used: bool,
        validate_calls: Mutex<Vec<String>>,
        mark_used_calls: Mutex<Vec<String>>,
        mark_used_notify: Notify,
    }

    impl MockTokenService {
        pub fn new(reply: MockReply) -> Self {
            Self {
                reply,
                fail_mark_used: false,
                validate_calls: Mutex::new(Vec::new()),
                mark_used_calls: Mutex::new(Vec::new()),
                mark_used_notify: Notify::new(),
            }
        }

        /// A service that accepts every token with the given identity.
        pub fn accepting(name: Option<&str>, email: Option<&str>) -> Self {
            Self::new(MockReply::Result(ValidationResult {
                valid: true,
                name: name.map(str::to_string),
                email: email.map(str::to_string),
            }))
        }

        pub fn failing_mark_used(mut self) -> Self {
            self.fail_mark_used = true;
            self
        }

        pub fn validate_calls(&self) -> Vec<String> {
            self.validate_calls.lock().unwrap().clone()
        }

        pub fn mark_used_calls(&self) -> Vec<String> {
            self.mark_used_calls.lock().unwrap().clone()
        }

        /// Waits until at least `count` mark-used calls were made, or `within` elapsed.
        pub async fn wait_for_mark_used(&self, count: usize, within: Duration) -> bool {
            let deadline = tokio::time::Instant::now() + within;
            loop {
                if self.mark_used_calls.lock().unwrap().len() >= count {
                    return true;
                }
                if tokio::time::timeout_at(deadline, self.mark_used_notify.notified())
                    .await
                    .is_err()
                {
                    return false;
                }
            }
        }
    }

    impl TokenService for MockTokenService {
        type Error = TokenServiceError;

        fn validate_token(&self, token: &str) -> BoxFuture<'_, ValidationResult, Self::Error> {
            self.validate_calls.lock().unwrap().push(token.to_string());
            let reply = self.reply.clone();
            Box::pin(async move {
                match reply {
                    MockReply::Result(result) => Ok(result),
                    MockReply::Status(status_code) => Err(TokenServiceError::ApiError {
                        status_code,
                        message: "mock failure".to_string(),
                    }),
                    MockReply::MalformedBody => {
                        Err(serde_json::from_str::<ValidationResult>("<html>oops</html>")
                            .unwrap_err()
                            .into())
                    }
                }
            })
        }

        fn mark_token_used(&self, token: &str) -> BoxFuture<'_, (), Self::Error> {
            self.mark_used_calls.lock().unwrap().push(token.to_string());
            self.mark_used_notify.notify_one();
            let fail = self.fail_mark_used;
            Box::pin(async move {
                if fail {
                    Err(TokenServiceError::ApiError {
                        status_code: 502,
                        message: "mock failure".to_string(),
                    })
                } else {
                    Ok(())
                }
            })
        }
    }
}
