//! Retry policy for fetches.
//!
//! Two paths share this module: the single-request path (manifests and
//! standalone resources), where 404 and transport failures are fatal, and the
//! segment path, where every failure is retried until the fixed cap.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_http_status};
pub use error::{AttemptFailure, FetchError};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy, RetryScope, MAX_SEGMENT_RETRY};
pub use run::{fetch_with_retry, run_with_retry};
