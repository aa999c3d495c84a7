//! Progress reporting for a segmented download (segments received, rate, ETA).
//!
//! The session builds a snapshot after every received segment; consumers can
//! compute rate and ETA from it without tracking time themselves.

/// Snapshot of download progress for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressStats {
    /// Segments received so far (not necessarily written yet).
    pub segments_received: usize,
    /// Total number of segments in the SegmentList.
    pub segment_count: usize,
    /// Payload bytes received so far.
    pub bytes_received: u64,
    /// Elapsed time since the download phase started (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Receive rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_received as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining, extrapolated from segments per second.
    /// `None` while nothing has been received.
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.segment_count.saturating_sub(self.segments_received);
        if remaining == 0 {
            return Some(0.0);
        }
        if self.segments_received == 0 || self.elapsed_secs <= 0.0 {
            return None;
        }
        let per_segment = self.elapsed_secs / self.segments_received as f64;
        Some(per_segment * remaining as f64)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.segment_count == 0 {
            return 1.0;
        }
        (self.segments_received as f64 / self.segment_count as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(received: usize, total: usize, bytes: u64, secs: f64) -> ProgressStats {
        ProgressStats {
            segments_received: received,
            segment_count: total,
            bytes_received: bytes,
            elapsed_secs: secs,
        }
    }

    #[test]
    fn rate_and_fraction() {
        let s = stats(5, 20, 1000, 2.0);
        assert!((s.bytes_per_sec() - 500.0).abs() < 1e-9);
        assert!((s.fraction() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn eta_from_segment_pace() {
        let s = stats(5, 20, 1000, 10.0);
        assert!((s.eta_secs().unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(stats(0, 20, 0, 1.0).eta_secs(), None);
        assert_eq!(stats(20, 20, 0, 1.0).eta_secs(), Some(0.0));
    }

    #[test]
    fn empty_list_is_complete() {
        assert_eq!(stats(0, 0, 0, 0.0).fraction(), 1.0);
        assert_eq!(stats(0, 0, 0, 0.0).bytes_per_sec(), 0.0);
    }
}
