use std::time::Duration;

/// High-level classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP 404.
    NotFound,
    /// Any other non-2xx status.
    Status(u32),
    /// The fetch primitive raised an error; no status was obtained.
    Transport,
}

/// Which path the policy governs. The two paths disagree on what is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryScope {
    /// Manifest or standalone resource: 404 and transport failures are fatal.
    Request,
    /// Segment of a SegmentList: every failure is retried until the cap.
    Segment,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop now; the failure is fatal for this kind.
    Fatal,
    /// Stop now; the retry budget is spent.
    Exhausted,
    /// Dispatch the same URL again after the given delay.
    RetryAfter(Duration),
}

/// Bounded retry policy with optional exponential backoff.
///
/// `max_retries` counts re-dispatches, so a URL is attempted at most
/// `max_retries + 1` times. A zero `base_delay` retries immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub scope: RetryScope,
}

/// Fixed retry cap for segment fetches.
pub const MAX_SEGMENT_RETRY: u32 = 3;

impl RetryPolicy {
    /// Policy for single-request flows (manifests, standalone resources).
    pub fn request(retry_count: u32) -> Self {
        Self {
            max_retries: retry_count,
            base_delay: Duration::ZERO,
            max_delay: Duration::from_secs(30),
            scope: RetryScope::Request,
        }
    }

    /// Policy for segment fetches, capped at [`MAX_SEGMENT_RETRY`].
    pub fn segment() -> Self {
        Self {
            max_retries: MAX_SEGMENT_RETRY,
            base_delay: Duration::ZERO,
            max_delay: Duration::from_secs(30),
            scope: RetryScope::Segment,
        }
    }

    pub fn with_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Decide what to do after a failed attempt.
    ///
    /// `retries_used` is how many re-dispatches already happened for this URL
    /// (0 after the first attempt fails).
    pub fn decide(&self, retries_used: u32, kind: ErrorKind) -> RetryDecision {
        if self.scope == RetryScope::Request
            && matches!(kind, ErrorKind::NotFound | ErrorKind::Transport)
        {
            return RetryDecision::Fatal;
        }
        if retries_used >= self.max_retries {
            return RetryDecision::Exhausted;
        }
        // base * 2^retries_used, capped.
        let exp = 1u32 << retries_used.min(8);
        let delay = self.base_delay.saturating_mul(exp).min(self.max_delay);
        RetryDecision::RetryAfter(delay)
    }
}
