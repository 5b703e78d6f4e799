use thiserror::Error;

/// Failure reported by a remote collaborator (record or favorite source).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Timeout applied to the request.
        timeout_secs: u64,
    },
    /// The service answered with an error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error text from the client or response.
        message: String,
    },
    /// The request could not be delivered.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error text.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Decoder error text.
        message: String,
    },
    /// The source refused the operation without a transport failure.
    #[error("source rejected the request: {message}")]
    Rejected {
        /// Reason given by the source.
        message: String,
    },
}

impl SourceError {
    /// Shorthand for [`SourceError::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}
