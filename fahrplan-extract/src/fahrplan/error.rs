//! Fahrplan client error types.

/// Errors from the Fahrplan HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum FahrplanError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// No API token has been configured
    #[error("not configured: {0}")]
    NotConfigured(String),
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(" (body: {body})"),
        None => String::new(),
    }
}

impl FahrplanError {
    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FahrplanError::Api { status, .. } => Some(*status),
            FahrplanError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the API rejected the request for exceeding its quota.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Whether the API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FahrplanError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = FahrplanError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(
            err.to_string(),
            "JSON parse error: expected value (body: <html>)"
        );

        let err = FahrplanError::Json {
            message: "expected value".into(),
            body: None,
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");

        let err = FahrplanError::NotConfigured("missing API token".into());
        assert_eq!(err.to_string(), "not configured: missing API token");
    }

    #[test]
    fn status_predicates() {
        let limited = FahrplanError::Api {
            status: 429,
            message: String::new(),
        };
        assert!(limited.is_rate_limited());
        assert!(!limited.is_unauthorized());

        let denied = FahrplanError::Api {
            status: 401,
            message: String::new(),
        };
        assert!(denied.is_unauthorized());

        let forbidden = FahrplanError::Api {
            status: 403,
            message: String::new(),
        };
        assert!(forbidden.is_unauthorized());

        let missing = FahrplanError::NotConfigured("token".into());
        assert_eq!(missing.status(), None);
        assert!(!missing.is_rate_limited());
    }
}
