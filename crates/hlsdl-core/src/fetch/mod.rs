//! Network fetch primitive.
//!
//! The engine only talks to the network through the [`Fetcher`] trait so the
//! scheduler and session driver can be exercised against scripted fakes.
//! [`CurlFetcher`] is the libcurl-backed implementation used by the CLI.

mod curl_fetcher;

pub use curl_fetcher::{CurlFetcher, CurlOptions};

use std::borrow::Cow;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Transport-level failure: no HTTP status was obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Curl(#[from] curl::Error),
    #[error("{0}")]
    Other(String),
}

/// Blocking GET primitive. Implementations must be shareable across the
/// scheduler's worker threads.
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(206, "").is_success());
        assert!(!HttpResponse::new(304, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
    }

    #[test]
    fn text_is_lossy() {
        let r = HttpResponse::new(200, vec![b'#', b'E', 0xff]);
        assert_eq!(r.text(), "#E\u{fffd}");
    }
}
