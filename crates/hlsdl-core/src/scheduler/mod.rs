//! Segment scheduler: concurrent, retrying fetch of a SegmentList.

mod progress;
mod run;

pub use progress::ProgressStats;
pub use run::{download_segments, SchedulerOptions, SegmentPayload};
