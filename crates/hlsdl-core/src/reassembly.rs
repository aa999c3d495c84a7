//! Reorder buffer between the scheduler and the artifact sink.
//!
//! Payloads arrive in completion order. The writer holds out-of-order ones and
//! flushes the contiguous run starting at `next_index`, so the sink sees each
//! segment exactly once, in SegmentList order.
//!
//! Entries are keyed by list index rather than URL: a playlist that repeats a
//! URL still gets one write per position.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::scheduler::SegmentPayload;
use crate::storage::ArtifactSink;

pub struct ReassemblyWriter<S: ArtifactSink> {
    sink: S,
    total: usize,
    next_index: usize,
    pending: BTreeMap<usize, Vec<u8>>,
    written_bytes: u64,
}

impl<S: ArtifactSink> ReassemblyWriter<S> {
    /// Writer for a list of `total` segments.
    pub fn new(sink: S, total: usize) -> Self {
        Self {
            sink,
            total,
            next_index: 0,
            pending: BTreeMap::new(),
            written_bytes: 0,
        }
    }

    /// Buffers `payload` and writes every segment that is now in order.
    /// Returns how many segments were written by this call.
    ///
    /// Out-of-range indices and payloads for positions already written or
    /// buffered are ignored.
    pub fn accept(&mut self, payload: SegmentPayload) -> Result<usize> {
        let SegmentPayload { index, bytes, .. } = payload;
        if index >= self.total || index < self.next_index || self.pending.contains_key(&index) {
            tracing::trace!(index, "ignoring unexpected segment payload");
            return Ok(0);
        }
        self.pending.insert(index, bytes);

        let mut flushed = 0;
        while let Some(bytes) = self.pending.remove(&self.next_index) {
            self.sink.write(&bytes)?;
            self.written_bytes += bytes.len() as u64;
            self.next_index += 1;
            flushed += 1;
        }
        Ok(flushed)
    }

    /// Segments written to the sink so far.
    pub fn written(&self) -> usize {
        self.next_index
    }

    pub fn written_bytes(&self) -> u64 {
        self.written_bytes
    }

    /// Segments received but waiting on an earlier one.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_complete(&self) -> bool {
        self.next_index == self.total
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Drops anything still buffered and returns the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
