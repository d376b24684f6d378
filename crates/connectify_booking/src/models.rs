// --- File: crates/connectify_booking/src/models.rs ---

use serde::Serialize;
use std::fmt;

pub use connectify_common::ValidationResult;

/// Which of the three page state containers is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiState {
    Loading,
    Error,
    Success,
}

impl UiState {
    pub const ALL: [UiState; 3] = [UiState::Loading, UiState::Error, UiState::Success];

    /// Element id of the container shown for this state.
    pub fn container_id(&self) -> &'static str {
        match self {
            UiState::Loading => "bookingLoading",
            UiState::Error => "bookingError",
            UiState::Success => "bookingSuccess",
        }
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiState::Loading => "loading",
            UiState::Error => "error",
            UiState::Success => "success",
        };
        f.write_str(name)
    }
}

/// Identity used to personalize the page and prefill the widget.
///
/// Built once from a positive validation result and never mutated. Empty
/// strings are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonalizationData {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Serialize)]
struct PrefillQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

impl PersonalizationData {
    pub fn new(name: Option<String>, email: Option<String>) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
            email: email.filter(|e| !e.is_empty()),
        }
    }

    /// Identity hints of a validation result; `None` unless the token was valid.
    pub fn from_validation(result: &ValidationResult) -> Option<Self> {
        result
            .valid
            .then(|| Self::new(result.name.clone(), result.email.clone()))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// First word of the name, used in the welcome message.
    pub fn first_name(&self) -> Option<&str> {
        self.name.as_deref()?.split_whitespace().next()
    }

    /// Form-encoded prefill parameters (`name=Jane+Doe&email=jane%40x.com`),
    /// or `None` when there is nothing to prefill.
    pub fn prefill_query(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        serde_urlencoded::to_string(PrefillQuery {
            name: self.name(),
            email: self.email(),
        })
        .ok()
    }

    /// The prefill object handed to the widget initializer.
    pub fn prefill(&self) -> Prefill {
        Prefill {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
        }
    }
}

/// Widget form prefill; absent values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
}

/// Arguments of the widget's inline initializer.
///
/// The parent element is owned by the widget host, which mounts into its own
/// container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineWidgetOptions {
    pub url: String,
    pub prefill: Prefill,
}
