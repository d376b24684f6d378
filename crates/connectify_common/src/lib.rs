// --- File: crates/connectify_common/src/lib.rs ---

// Declare modules within this crate
pub mod models;    // Data structures and models
pub mod error;     // Error handling
pub mod http;      // HTTP utilities
pub mod services;  // Service abstractions
pub mod logging;   // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    ConnectifyError,
    Context,
    config_error,
    validation_error,
    external_service_error,
};

// Re-export HTTP utilities for easier access
pub use http::{client::create_client, join_url, ACCEPT_JSON};

// Re-export logging utilities for easier access
pub use logging::{
    init,
    init_with_level,
    parse_level,
    log_error,
    log_result,
};

// Re-export the service abstractions
pub use models::ValidationResult;
pub use services::{BoxFuture, TokenService};

// This crate provides common functionality that can be used across the application.
// It includes shared models, error handling, logging, HTTP utilities and service traits.
