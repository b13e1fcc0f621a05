//! Error types for the Odoo client.

/// Result type for client operations.
pub type OdooResult<T> = Result<T, OdooError>;

/// Error types that can occur when talking to Odoo.
#[derive(Debug, thiserror::Error)]
pub enum OdooError {
    /// HTTP request failed (DNS, TLS, connection reset, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status.
    #[error("HTTP status {status}: {message}")]
    Status { status: u16, message: String },

    /// Odoo rejected the call with an XML-RPC fault.
    #[error("Odoo fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// Login was rejected.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The response body was not a valid XML-RPC document.
    #[error("Malformed XML-RPC response: {0}")]
    Malformed(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl OdooError {
    /// Whether this error comes from credential rejection rather than the call itself.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Human readable message reported back to tool callers.
    ///
    /// Faults carry only the remote message, without the code prefix.
    pub fn remote_message(&self) -> String {
        match self {
            Self::Fault { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Create an error from a non-success status code and response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = body.trim();
        Self::Status {
            status,
            message: if message.is_empty() {
                "empty response body".to_string()
            } else {
                message.chars().take(512).collect()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_message_strips_fault_code() {
        let err = OdooError::Fault {
            code: 1,
            message: "Invalid field 'foo' on model 'project.task'".to_string(),
        };
        assert_eq!(
            err.remote_message(),
            "Invalid field 'foo' on model 'project.task'"
        );
        assert_eq!(
            err.to_string(),
            "Odoo fault 1: Invalid field 'foo' on model 'project.task'"
        );
    }

    #[test]
    fn test_from_response_truncates_body() {
        let body = "x".repeat(2000);
        match OdooError::from_response(502, &body) {
            OdooError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), 512);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_response_empty_body() {
        let err = OdooError::from_response(404, "  ");
        assert_eq!(err.to_string(), "HTTP status 404: empty response body");
    }

    #[test]
    fn test_is_authentication() {
        assert!(OdooError::Authentication("nope".into()).is_authentication());
        assert!(!OdooError::Config("nope".into()).is_authentication());
    }
}
