// --- File: crates/connectify_common/src/http.rs ---

// Include the client module
pub mod client;

/// Header value used when a JSON response is requested.
pub const ACCEPT_JSON: &str = "application/json";

/// Joins a service base URL and an API path without doubling the slash.
///
/// `join_url("https://svc.example/", "/api/validate-token")` yields
/// `https://svc.example/api/validate-token`.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://svc.example/", "/api/mark-used"),
            "https://svc.example/api/mark-used"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8787", "api/validate-token"),
            "http://127.0.0.1:8787/api/validate-token"
        );
    }
}
