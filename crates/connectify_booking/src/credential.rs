// --- File: crates/connectify_booking/src/credential.rs ---
//! Booking token extraction and the local format pre-check.

use crate::error::BookingError;
use std::fmt;

/// Query parameter carrying the booking token.
pub const TOKEN_PARAM: &str = "token";

/// Exact length of a well-formed token (32 random bytes, hex encoded).
pub const TOKEN_LENGTH: usize = 64;

const FINGERPRINT_LEN: usize = 8;

/// Reads the `token` query parameter from a page location.
///
/// Accepts absolute URLs (`https://host/book?token=...`), relative locations
/// (`/book?token=...`) and bare query strings (`?token=...`). The fragment is
/// ignored; when the parameter repeats, the first value wins.
pub fn extract_token(location: &str) -> Option<String> {
    let location = location.split_once('#').map_or(location, |(before, _)| before);
    let (_, query) = location.split_once('?')?;

    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value)
}

/// True for exactly 64 characters of `[0-9A-Fa-f]`.
pub fn is_well_formed(raw: &str) -> bool {
    raw.len() == TOKEN_LENGTH && hex::decode(raw).is_ok()
}

/// A booking token that passed the format pre-check.
///
/// Immutable once constructed. `Debug` and `Display` only show a short
/// fingerprint so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Runs the format pre-check on an extracted value.
    ///
    /// An empty value counts as missing.
    pub fn parse(raw: Option<&str>) -> Result<Self, BookingError> {
        match raw {
            None | Some("") => Err(BookingError::MissingCredential),
            Some(value) if is_well_formed(value) => Ok(Self(value.to_string())),
            Some(value) => Err(BookingError::MalformedCredential {
                length: value.chars().count(),
            }),
        }
    }

    /// Extracts and checks the token of a page location in one step.
    pub fn from_location(location: &str) -> Result<Self, BookingError> {
        Self::parse(extract_token(location).as_deref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First characters of the token, for log correlation.
    pub fn fingerprint(&self) -> &str {
        &self.0[..FINGERPRINT_LEN]
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({}…)", self.fingerprint())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}…", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn test_extract_token_from_absolute_url() {
        let location = format!("https://book.example.com/booking.html?token={TOKEN}&ref=mail");
        assert_eq!(extract_token(&location).as_deref(), Some(TOKEN));
    }

    #[test]
    fn test_extract_token_from_relative_and_bare_query() {
        assert_eq!(
            extract_token(&format!("/booking?token={TOKEN}")).as_deref(),
            Some(TOKEN)
        );
        assert_eq!(
            extract_token(&format!("?a=1&token={TOKEN}")).as_deref(),
            Some(TOKEN)
        );
    }

    #[test]
    fn test_extract_token_absent() {
        assert_eq!(extract_token("https://book.example.com/booking.html"), None);
        assert_eq!(extract_token("https://book.example.com/?tokens=abc"), None);
        assert_eq!(extract_token("https://book.example.com/#?token=abc"), None);
    }

    #[test]
    fn test_extract_token_first_value_wins_and_decodes() {
        assert_eq!(
            extract_token("/b?token=a%20b&token=second").as_deref(),
            Some("a b")
        );
        assert_eq!(extract_token("/b?token=abc#frag").as_deref(), Some("abc"));
    }

    #[test]
    fn test_parse_accepts_mixed_case_hex() {
        let upper = TOKEN.to_uppercase();
        let credential = Credential::parse(Some(&upper)).unwrap();
        assert_eq!(credential.as_str(), upper);
    }

    #[test]
    fn test_parse_missing_and_empty() {
        assert_eq!(Credential::parse(None), Err(BookingError::MissingCredential));
        assert_eq!(Credential::parse(Some("")), Err(BookingError::MissingCredential));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        for len in [1, 32, 63, 65, 128] {
            let raw = "a".repeat(len);
            assert_eq!(
                Credential::parse(Some(&raw)),
                Err(BookingError::MalformedCredential { length: len })
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_hex_characters() {
        for bad in ['g', 'z', ' ', '-', 'é'] {
            let mut raw: String = TOKEN[..63].to_string();
            raw.push(bad);
            assert!(
                matches!(
                    Credential::parse(Some(&raw)),
                    Err(BookingError::MalformedCredential { .. })
                ),
                "accepted token ending in {bad:?}"
            );
        }
    }

    #[test]
    fn test_debug_and_display_hide_token() {
        let credential = Credential::parse(Some(TOKEN)).unwrap();
        assert_eq!(format!("{credential}"), "9f86d081…");
        assert_eq!(format!("{credential:?}"), "Credential(9f86d081…)");
    }

    #[test]
    fn test_from_location() {
        let credential = Credential::from_location(&format!("/b?token={TOKEN}")).unwrap();
        assert_eq!(credential.as_str(), TOKEN);
        assert_eq!(
            Credential::from_location("/b?token=xyz"),
            Err(BookingError::MalformedCredential { length: 3 })
        );
    }
}
