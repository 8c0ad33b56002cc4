//! Transport error taxonomy shared by the client and the cache.

/// Uniform failure of a single resource read.
///
/// The `Display` form is what the error banner shows, so every variant keeps
/// the `API error:` prefix and status failures carry the numeric code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("API error: {0}")]
    Status(u16),
    #[error("API error: malformed response body ({0})")]
    Parse(String),
    #[error("API error: request timed out")]
    Timeout,
    #[error("API error: connection failed ({0})")]
    Connection(String),
}

impl TransportError {
    /// HTTP status code, when the failure came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_includes_code() {
        assert_eq!(TransportError::Status(500).to_string(), "API error: 500");
        assert_eq!(TransportError::Status(404).status_code(), Some(404));
    }

    #[test]
    fn test_non_status_errors_have_no_code() {
        assert_eq!(TransportError::Timeout.status_code(), None);
        assert_eq!(TransportError::Parse("eof".into()).status_code(), None);
    }

    #[test]
    fn test_json_error_converts_to_parse() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(matches!(TransportError::from(err), TransportError::Parse(_)));
    }
}
