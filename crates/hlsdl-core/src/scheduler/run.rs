//! Bounded worker pool over a SegmentList.
//!
//! `min(max_concurrency, N)` workers each hold at most one segment. The calling
//! thread owns the FIFO of pending indices and is the only consumer of the
//! results channel: for each success it hands that worker its next index, then
//! invokes the completion handler. A worker is refilled only when the consumer
//! takes its previous result, so a cancel or a fatal failure stops dispatch
//! immediately.
//! Retries happen inside the worker, so a retried URL keeps its slot.

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::fetch::{Fetcher, HttpResponse};
use crate::manifest::SegmentList;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

/// One successfully fetched segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPayload {
    /// Position in the SegmentList.
    pub index: usize,
    pub url: String,
    pub bytes: Vec<u8>,
}

/// Session-scoped scheduler settings.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerOptions {
    /// Maximum requests in flight; values below 1 are treated as 1.
    pub max_concurrency: usize,
    pub retry: RetryPolicy,
}

impl SchedulerOptions {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency,
            retry: RetryPolicy::segment(),
        }
    }
}

/// What a worker reports back to the consumer.
enum Report {
    Done {
        worker: usize,
        index: usize,
        result: Result<HttpResponse, FetchError>,
    },
    /// The fetch panicked; the worker re-raises after reporting.
    Panicked,
}

/// Fetches every URL in `urls` and hands each payload to `on_segment` in
/// completion order.
///
/// Returns `Ok(true)` when all segments were delivered, `Ok(false)` as soon as
/// `on_segment` returns `false` (cooperative cancellation: nothing new is
/// dispatched, requests already in flight finish and are dropped), and
/// `Err(RetryExhausted)` when one URL fails `retry.max_retries + 1` times.
/// At any moment at most one request per worker is in flight, and none is
/// dispatched after the handler cancels or a fetch fails.
/// Returns only after every worker has exited.
pub fn download_segments<H>(
    fetcher: &dyn Fetcher,
    urls: &SegmentList,
    opts: &SchedulerOptions,
    mut on_segment: H,
) -> Result<bool, FetchError>
where
    H: FnMut(SegmentPayload) -> bool,
{
    let count = urls.len();
    if count == 0 {
        return Ok(true);
    }

    let mut pending: VecDeque<usize> = (0..count).collect();
    let stop = AtomicBool::new(false);
    let num_workers = opts.max_concurrency.max(1).min(count);
    let (tx, rx) = mpsc::channel::<Report>();

    tracing::debug!(segments = count, workers = num_workers, "segment download start");

    std::thread::scope(|scope| {
        let mut jobs: Vec<Option<mpsc::Sender<usize>>> = Vec::with_capacity(num_workers);
        for worker in 0..num_workers {
            let (job_tx, job_rx) = mpsc::channel::<usize>();
            jobs.push(Some(job_tx));
            let tx = tx.clone();
            let stop = &stop;
            scope.spawn(move || {
                for index in job_rx {
                    let Some(url) = urls.get(index) else {
                        break;
                    };
                    let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
                        run_with_retry(&opts.retry, url, Some(stop), || fetcher.get(url))
                    }));
                    match attempt {
                        Ok(result) => {
                            let report = Report::Done {
                                worker,
                                index,
                                result,
                            };
                            if tx.send(report).is_err() {
                                break;
                            }
                        }
                        Err(payload) => {
                            let _ = tx.send(Report::Panicked);
                            panic::resume_unwind(payload);
                        }
                    }
                }
            });
        }
        drop(tx);

        let mut in_flight = 0usize;
        for slot in &jobs {
            if let (Some(job), Some(index)) = (slot, pending.pop_front()) {
                if job.send(index).is_ok() {
                    in_flight += 1;
                }
            }
        }

        let mut completed = 0usize;
        while in_flight > 0 {
            let Ok(report) = rx.recv() else {
                break;
            };
            let (worker, index, result) = match report {
                Report::Done {
                    worker,
                    index,
                    result,
                } => (worker, index, result),
                Report::Panicked => {
                    // The scope re-raises the panic when it joins.
                    halt(&stop, &mut jobs);
                    return Ok(false);
                }
            };
            in_flight -= 1;
            match result {
                Ok(resp) => {
                    completed += 1;
                    // Refill the freed slot before the handler runs; a cancel
                    // answer then stops everything after it.
                    if refill(&mut jobs, worker, &mut pending) {
                        in_flight += 1;
                    }
                    let payload = SegmentPayload {
                        index,
                        url: urls.get(index).unwrap_or_default().to_string(),
                        bytes: resp.body,
                    };
                    if !on_segment(payload) {
                        halt(&stop, &mut jobs);
                        tracing::info!(completed, segments = count, "segment download cancelled");
                        return Ok(false);
                    }
                    if completed == count {
                        tracing::debug!(segments = count, "segment download complete");
                        return Ok(true);
                    }
                }
                Err(FetchError::Aborted { .. }) => {}
                Err(e) => {
                    halt(&stop, &mut jobs);
                    tracing::warn!(
                        index,
                        undispatched = pending.len(),
                        "segment download failed: {}",
                        e
                    );
                    return Err(e);
                }
            }
        }
        Ok(completed == count)
    })
}

/// Hands `worker` the next pending index. Returns false (and retires the
/// worker) when the queue is empty or the worker is gone.
fn refill(
    jobs: &mut [Option<mpsc::Sender<usize>>],
    worker: usize,
    pending: &mut VecDeque<usize>,
) -> bool {
    let Some(slot) = jobs.get_mut(worker) else {
        return false;
    };
    let Some(job) = slot.as_ref() else {
        return false;
    };
    let Some(next) = pending.pop_front() else {
        *slot = None;
        return false;
    };
    if job.send(next).is_ok() {
        return true;
    }
    pending.push_front(next);
    *slot = None;
    false
}

/// Stops retries in flight and drops every job sender: idle workers exit,
/// busy ones finish their current segment first.
fn halt(stop: &AtomicBool, jobs: &mut Vec<Option<mpsc::Sender<usize>>>) {
    stop.store(true, Ordering::Relaxed);
    jobs.clear();
}
