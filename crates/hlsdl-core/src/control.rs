//! Cooperative cancellation shared between a session and its controller.
//!
//! The session never polls the token itself. A progress surface checks it in
//! `on_progress` and answers cancel, which stops new dispatches; requests
//! already in flight finish and are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancel flag (e.g. set from a Ctrl-C handler).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Returns `true` if it was already requested.
    pub fn cancel(&self) -> bool {
        self.flag.swap(true, Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        assert!(!token.cancel());
        assert!(other.is_cancelled());
        assert!(other.cancel());
    }
}
