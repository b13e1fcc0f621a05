//! Errors reported back to the agent by tool calls.

use odoo_client::OdooError;

pub type ToolResult<T> = Result<T, ToolError>;

/// Per-call failure. Never fatal to the server.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool input is missing a required field or has the wrong shape.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Odoo rejected the configured credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Odoo (or the network in between) failed the call.
    #[error("Odoo call failed: {0}")]
    RemoteOperation(String),
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<OdooError> for ToolError {
    fn from(err: OdooError) -> Self {
        match err {
            OdooError::Authentication(reason) => Self::Authentication(reason),
            other => Self::RemoteOperation(other.remote_message()),
        }
    }
}
