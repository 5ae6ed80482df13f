// Fetch failure taxonomy shared by the HTTP client and the pipeline.

use thiserror::Error;

/// The two ways a request can fail. Empty results are not failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server was unreachable or answered with a non-success status.
    #[error("request to {path} failed: {message}")]
    Transport {
        path: String,
        status: Option<u16>,
        message: String,
    },

    /// The response parsed but lacked the fields we consume.
    #[error("unexpected response shape from {path}: {message}")]
    InvalidShape { path: String, message: String },
}

impl FetchError {
    pub fn transport(path: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        FetchError::Transport {
            path: path.into(),
            status,
            message: message.into(),
        }
    }

    pub fn invalid_shape(path: impl Into<String>, message: impl Into<String>) -> Self {
        FetchError::InvalidShape {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. })
    }

    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { status, .. } => *status,
            FetchError::InvalidShape { .. } => None,
        }
    }

    /// Static text suitable for inline display. The `Display` form carries
    /// paths and transport detail and belongs in the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "Could not reach the server. Try again.",
            FetchError::InvalidShape { .. } => "The server sent an unexpected response.",
        }
    }
}
