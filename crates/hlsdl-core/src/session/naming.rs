//! Artifact naming: local timestamp with millisecond precision.

use chrono::{DateTime, Local, TimeZone};

/// Extension of every assembled artifact; segments are joined byte-for-byte.
pub const ARTIFACT_EXT: &str = ".bin";

/// `YYYY-MM-DD_HH-MM-SS.mmm.bin` for `at`.
pub fn artifact_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}", at.format("%Y-%m-%d_%H-%M-%S%.3f"), ARTIFACT_EXT)
}

/// Name for an artifact created now, in local time.
pub fn artifact_name_now() -> String {
    artifact_name(&Local::now())
}
