//! libcurl-backed [`Fetcher`]: one Easy handle per request.

use std::collections::HashMap;
use std::time::Duration;

use super::{Fetcher, HttpResponse, TransportError};

/// Timeouts applied to every request. The low-speed cutoff frees a worker slot
/// held by a stalled transfer instead of waiting on it forever.
#[derive(Debug, Clone, Copy)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Abort when throughput stays below this many bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
        }
    }
}

/// Blocking GET via libcurl. Follows redirects and sends `headers` with every
/// request (e.g. a `Cookie` copied from a captured request).
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    headers: HashMap<String, String>,
    options: CurlOptions,
}

impl CurlFetcher {
    pub fn new(options: CurlOptions) -> Self {
        Self {
            headers: HashMap::new(),
            options,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    fn perform(&self, url: &str) -> Result<HttpResponse, curl::Error> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.low_speed_limit(self.options.low_speed_limit)?;
        easy.low_speed_time(self.options.low_speed_time)?;

        if !self.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &self.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(HttpResponse { status, body })
    }
}

impl Fetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let res = self.perform(url);
        match &res {
            Ok(r) => tracing::trace!(url, status = r.status, bytes = r.body.len(), "GET done"),
            Err(e) => tracing::debug!(url, "GET transport error: {}", e),
        }
        res.map_err(TransportError::Curl)
    }
}
