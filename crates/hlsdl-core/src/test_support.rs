//! Scripted collaborators for unit tests.

use std::collections::{HashMap, VecDeque};
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::export::Exporter;
use crate::fetch::{Fetcher, HttpResponse, TransportError};
use crate::manifest::VariantSet;
use crate::scheduler::ProgressStats;
use crate::session::{ProgressSurface, SessionState};

/// Fetcher driven by per-URL scripts. `Ok(status)` answers with that status,
/// `Err(())` raises a transport error. Unscripted (or exhausted) URLs answer
/// 200. Success bodies are the configured body or the URL bytes.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<Result<u32, ()>>>>,
    bodies: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    attempts: Mutex<HashMap<String, u32>>,
    dispatch_log: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, url: &str, steps: &[Result<u32, ()>]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), steps.iter().copied().collect());
        self
    }

    pub fn body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(url.to_string(), body.into());
        self
    }

    pub fn delay(mut self, url: &str, d: Duration) -> Self {
        self.delays.insert(url.to_string(), d);
        self
    }

    pub fn default_delay(mut self, d: Duration) -> Self {
        self.default_delay = d;
        self
    }

    pub fn attempts(&self, url: &str) -> u32 {
        self.attempts.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Every dispatch (first attempts and retries) in dispatch order.
    pub fn dispatched(&self) -> Vec<String> {
        self.dispatch_log.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Fetcher for ScriptedFetcher {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.dispatch_log.lock().unwrap().push(url.to_string());
        *self.attempts.lock().unwrap().entry(url.to_string()).or_default() += 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(url).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|q| q.pop_front())
            .unwrap_or(Ok(200));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match step {
            Ok(status) if (200..300).contains(&status) => {
                let body = self
                    .bodies
                    .get(url)
                    .cloned()
                    .unwrap_or_else(|| url.as_bytes().to_vec());
                Ok(HttpResponse::new(status, body))
            }
            Ok(status) => Ok(HttpResponse::new(status, Vec::new())),
            Err(()) => Err(TransportError::Other(format!("connection reset: {}", url))),
        }
    }
}

/// How [`RecordingSurface`] answers the variant chooser.
pub(crate) enum Choice {
    Index(usize),
    Dismiss,
}

/// Progress surface that records everything and cancels on request.
pub(crate) struct RecordingSurface {
    pub choice: Choice,
    /// Answer `false` when this many segments have been received.
    pub cancel_at: Option<usize>,
    pub progress: Vec<usize>,
    pub states: Vec<SessionState>,
    pub offered: Vec<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            choice: Choice::Index(0),
            cancel_at: None,
            progress: Vec::new(),
            states: Vec::new(),
            offered: Vec::new(),
        }
    }
}

impl ProgressSurface for RecordingSurface {
    fn on_progress(&mut self, stats: &ProgressStats) -> bool {
        self.progress.push(stats.segments_received);
        self.cancel_at != Some(stats.segments_received)
    }

    fn choose_variant(&mut self, variants: &VariantSet) -> Option<String> {
        self.offered = variants.iter().map(|v| v.url.clone()).collect();
        match self.choice {
            Choice::Index(i) => variants.nth(i).map(|v| v.url.clone()),
            Choice::Dismiss => None,
        }
    }

    fn on_state(&mut self, state: SessionState) {
        self.states.push(state);
    }
}

/// Exporter that keeps exported blobs in memory.
#[derive(Default)]
pub(crate) struct CollectingExporter {
    pub exported: Mutex<Vec<(String, Vec<u8>)>>,
}

impl Exporter for CollectingExporter {
    fn export(&self, blob: &mut dyn Read, suggested_name: &str) -> anyhow::Result<PathBuf> {
        let mut bytes = Vec::new();
        blob.read_to_end(&mut bytes)?;
        self.exported
            .lock()
            .unwrap()
            .push((suggested_name.to_string(), bytes));
        Ok(PathBuf::from(suggested_name))
    }
}
