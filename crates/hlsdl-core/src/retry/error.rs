//! Fetch error taxonomy shared by the single-request and segment paths.

use crate::fetch::TransportError;

/// Terminal failure of a fetch after the retry policy has been applied.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP 404 on a single-request fetch. Never retried.
    #[error("not found -- {url}")]
    NotFound { url: String },
    /// Every allowed attempt failed.
    #[error("retry over -- {url} ({attempts} attempts)")]
    RetryExhausted { url: String, attempts: u32 },
    /// Transport failure on a single-request fetch. Never retried.
    #[error("network failure -- {url}")]
    Network {
        url: String,
        #[source]
        source: TransportError,
    },
    /// A stop was requested before the next attempt could be dispatched.
    #[error("aborted before retry -- {url}")]
    Aborted { url: String },
}

impl FetchError {
    /// URL the failure refers to.
    pub fn url(&self) -> &str {
        match self {
            FetchError::NotFound { url }
            | FetchError::RetryExhausted { url, .. }
            | FetchError::Network { url, .. }
            | FetchError::Aborted { url } => url,
        }
    }
}

/// Outcome of one failed attempt, before the policy decides what to do.
#[derive(Debug)]
pub enum AttemptFailure {
    /// Response arrived with a non-2xx status.
    Status(u32),
    /// No response at all.
    Transport(TransportError),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Status(code) => write!(f, "HTTP {}", code),
            AttemptFailure::Transport(e) => write!(f, "{}", e),
        }
    }
}
