// --- File: crates/connectify_booking/src/orchestrator.rs ---
//! The page load pipeline.
//!
//! ```text
//! Start -> NoToken | HasToken
//! HasToken -> FormatInvalid | FormatValid
//! FormatValid -> (validate) -> Invalid | Valid
//! Valid -> Success shown -> WidgetInit
//! ```
//!
//! NoToken, FormatInvalid and Invalid all end in the error state.

use connectify_common::TokenService;
use std::fmt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, Instrument};

use crate::credential::{extract_token, Credential};
use crate::error::{BookingError, TokenServiceError};
use crate::models::{PersonalizationData, UiState};
use crate::session::BookingSession;

/// Pipeline stages, in the order a successful load passes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    NoToken,
    HasToken,
    FormatInvalid,
    FormatValid,
    Invalid,
    Valid,
    WidgetInit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a page load ended.
#[derive(Debug)]
pub enum PageOutcome {
    /// The token was missing, malformed or not accepted; the error state is shown.
    Rejected(BookingError),
    /// The widget is up; `listener` reports the booking when it happens.
    Ready {
        identity: PersonalizationData,
        listener: JoinHandle<()>,
    },
    /// The token is valid but the widget library never loaded.
    WidgetUnavailable(BookingError),
}

impl PageOutcome {
    /// The state the page is left in.
    pub fn ui_state(&self) -> UiState {
        match self {
            PageOutcome::Rejected(_) => UiState::Error,
            PageOutcome::Ready { .. } | PageOutcome::WidgetUnavailable(_) => UiState::Success,
        }
    }

    /// The last stage the pipeline reached.
    pub fn stage(&self) -> Stage {
        match self {
            PageOutcome::Rejected(BookingError::MissingCredential) => Stage::NoToken,
            PageOutcome::Rejected(BookingError::MalformedCredential { .. }) => Stage::FormatInvalid,
            PageOutcome::Rejected(_) => Stage::Invalid,
            PageOutcome::Ready { .. } => Stage::WidgetInit,
            PageOutcome::WidgetUnavailable(_) => Stage::Valid,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PageOutcome::Ready { .. })
    }
}

impl<S> BookingSession<S>
where
    S: TokenService<Error = TokenServiceError> + 'static,
{
    /// Runs the page load pipeline for `location`, the page URL.
    pub async fn load(self, location: &str) -> PageOutcome {
        let span = info_span!("booking_page", session = %self.id);
        self.run(location).instrument(span).await
    }

    async fn run(self, location: &str) -> PageOutcome {
        debug!("stage {}", Stage::Start);
        self.ui.show_state(UiState::Loading);

        let raw = extract_token(location).filter(|token| !token.is_empty());
        debug!(
            "stage {}",
            if raw.is_some() { Stage::HasToken } else { Stage::NoToken }
        );

        let credential = match Credential::parse(raw.as_deref()) {
            Ok(credential) => credential,
            Err(e) => {
                info!("{}", e);
                return self.reject(e);
            }
        };
        debug!("stage {} ({})", Stage::FormatValid, credential);

        let result = self.validation.validate(&credential).await;
        let Some(identity) = PersonalizationData::from_validation(&result) else {
            debug!("stage {}", Stage::Invalid);
            return self.reject(BookingError::TokenRejected);
        };
        debug!("stage {}", Stage::Valid);

        self.ui.show_state(UiState::Success);
        if let Some(message) = self.welcome_message(&identity) {
            self.ui.set_welcome_message(&message);
        }

        match self
            .widget
            .initialize(identity.clone(), credential, self.reporter.clone())
            .await
        {
            Ok(listener) => {
                debug!("stage {}", Stage::WidgetInit);
                PageOutcome::Ready { identity, listener }
            }
            Err(e) => {
                error!("Scheduling widget could not be initialized: {}", e);
                PageOutcome::WidgetUnavailable(e)
            }
        }
    }

    fn reject(&self, reason: BookingError) -> PageOutcome {
        self.ui.show_state(UiState::Error);
        PageOutcome::Rejected(reason)
    }
}
