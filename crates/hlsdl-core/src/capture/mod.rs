//! Captured requests: the message stream from a capture layer, merged into a
//! filterable log of [`CaptureRecord`]s.
//!
//! Records come from a JSON-lines message dump or a HAR file. A record whose
//! response is an HLS playlist can be handed to a session; anything else is
//! fetched directly.

mod har;
mod log;
mod message;
mod record;
mod source;

pub use har::{har_messages, parse_har, HarLog, NO_TAB};
pub use log::{CaptureLog, KindFilter, TabFilter};
pub use message::{CaptureInfo, CaptureMessage, HeaderEntry, ResourceKind, UnknownKind};
pub use record::{CaptureRecord, HLS_CONTENT_TYPE};
pub use source::{load_capture_log, load_messages};
