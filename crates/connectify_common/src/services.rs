// --- File: crates/connectify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! This module provides trait definitions for external services used by the application.
//! These traits allow for dependency injection and easier testing by decoupling the
//! application logic from specific implementations of external services.

use crate::models::ValidationResult;
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A trait for the remote token service.
///
/// The service authoritatively validates single-use booking tokens and
/// consumes them once the booking is done.
pub trait TokenService: Send + Sync {
    /// Error type returned by token service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Validate a token; a successful call may still report `valid: false`.
    fn validate_token(&self, token: &str) -> BoxFuture<'_, ValidationResult, Self::Error>;

    /// Mark a token as used so it cannot be redeemed again.
    fn mark_token_used(&self, token: &str) -> BoxFuture<'_, (), Self::Error>;
}
