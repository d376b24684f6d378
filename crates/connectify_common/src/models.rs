// --- File: crates/connectify_common/src/models.rs ---

// Data structures shared between the service abstractions and their implementations.

use serde::{Deserialize, Serialize};

/// Outcome of a token validation call.
///
/// `name` and `email` are identity hints from the validation service. They are
/// only meaningful when `valid` is true and must be ignored otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the service accepted the token
    pub valid: bool,

    /// Full name of the token holder, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address of the token holder, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ValidationResult {
    /// The negative result every validation failure collapses to.
    pub fn invalid() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_identity() {
        let result: ValidationResult = serde_json::from_str(
            r#"{"valid":true,"name":"Jane Doe","email":"jane@x.com","expires":"2026-10-20"}"#,
        )
        .unwrap();

        assert!(result.valid);
        assert_eq!(result.name.as_deref(), Some("Jane Doe"));
        assert_eq!(result.email.as_deref(), Some("jane@x.com"));
    }

    #[test]
    fn test_deserialize_requires_valid_flag() {
        assert!(serde_json::from_str::<ValidationResult>(r#"{"name":"Jane"}"#).is_err());
        assert!(serde_json::from_str::<ValidationResult>(r#"{"valid":"yes"}"#).is_err());
    }

    #[test]
    fn test_invalid_has_no_identity() {
        let result = ValidationResult::invalid();
        assert!(!result.valid);
        assert!(result.name.is_none() && result.email.is_none());
    }
}
