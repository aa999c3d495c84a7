//! Classify a failed attempt into a retry policy error kind.

use super::error::AttemptFailure;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        404 => ErrorKind::NotFound,
        _ => ErrorKind::Status(code),
    }
}

/// Classify a failed attempt (status or transport) into an ErrorKind.
pub fn classify(failure: &AttemptFailure) -> ErrorKind {
    match failure {
        AttemptFailure::Status(code) => classify_http_status(*code),
        AttemptFailure::Transport(_) => ErrorKind::Transport,
    }
}
