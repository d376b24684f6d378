// --- File: crates/connectify_booking/src/lib.rs ---

// Declare modules within this crate
pub mod completion; // Marks tokens used after a booking
pub mod credential; // Token extraction and format pre-check
pub mod error; // Error handling
pub mod models; // Data structures and models
pub mod orchestrator; // Page load pipeline
pub mod page; // Page view abstraction and UI state
pub mod service; // HTTP token service
pub mod session; // Per-page-load context
pub mod validation; // Validation client
pub mod widget; // Scheduling widget coordination
#[cfg(test)]
mod test_logs;

// Re-export key types for the page runner
pub use completion::CompletionReporter;
pub use credential::{extract_token, Credential};
pub use error::{BookingError, FailureKind, TokenServiceError};
pub use models::{InlineWidgetOptions, PersonalizationData, Prefill, UiState, ValidationResult};
pub use orchestrator::PageOutcome;
pub use page::{HeadlessPage, PageView, UiStateController};
pub use service::HttpTokenService;
pub use session::BookingSession;
pub use validation::ValidationClient;
pub use widget::{ChannelWidgetHost, MessageBus, WidgetCoordinator, WidgetEvent, WidgetHost};
