//! Retry loop: run a fetch until success or the policy says stop.

use std::sync::atomic::{AtomicBool, Ordering};

use super::classify;
use super::error::{AttemptFailure, FetchError};
use super::policy::{RetryDecision, RetryPolicy};
use crate::fetch::{Fetcher, HttpResponse, TransportError};

/// Runs `f` until it yields a 2xx response or the policy says to stop.
///
/// A re-dispatch is skipped when `stop` is set, returning [`FetchError::Aborted`].
/// On retryable failure, sleeps for the backoff duration (if any) first.
pub fn run_with_retry<F>(
    policy: &RetryPolicy,
    url: &str,
    stop: Option<&AtomicBool>,
    mut f: F,
) -> Result<HttpResponse, FetchError>
where
    F: FnMut() -> Result<HttpResponse, TransportError>,
{
    let mut retries = 0u32;
    loop {
        let failure = match f() {
            Ok(resp) if resp.is_success() => return Ok(resp),
            Ok(resp) => AttemptFailure::Status(resp.status),
            Err(e) => AttemptFailure::Transport(e),
        };
        let kind = classify::classify(&failure);
        match policy.decide(retries, kind) {
            RetryDecision::Fatal => return Err(fatal_error(url, failure, retries + 1)),
            RetryDecision::Exhausted => {
                tracing::warn!(url, attempts = retries + 1, "retry over: {}", failure);
                return Err(FetchError::RetryExhausted {
                    url: url.to_string(),
                    attempts: retries + 1,
                });
            }
            RetryDecision::RetryAfter(d) => {
                retries += 1;
                tracing::debug!(url, retry = retries, "retry after {}", failure);
                if !d.is_zero() {
                    std::thread::sleep(d);
                }
                if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
                    return Err(FetchError::Aborted {
                        url: url.to_string(),
                    });
                }
            }
        }
    }
}

fn fatal_error(url: &str, failure: AttemptFailure, attempts: u32) -> FetchError {
    let url = url.to_string();
    match failure {
        AttemptFailure::Status(404) => FetchError::NotFound { url },
        AttemptFailure::Transport(source) => FetchError::Network { url, source },
        AttemptFailure::Status(_) => FetchError::RetryExhausted { url, attempts },
    }
}

/// Single-request fetch: up to `policy.max_retries + 1` attempts, 404 and
/// transport failures fatal immediately.
pub fn fetch_with_retry(
    fetcher: &dyn Fetcher,
    url: &str,
    policy: &RetryPolicy,
) -> Result<HttpResponse, FetchError> {
    run_with_retry(policy, url, None, || fetcher.get(url))
}
