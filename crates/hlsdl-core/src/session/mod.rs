//! Session driver: one HLS download from manifest URL to exported artifact.
//!
//! The driver owns the lifecycle. It fetches and classifies the manifest,
//! suspends on the surface's chooser for master playlists, builds the
//! SegmentList, and runs the scheduler with a [`ReassemblyWriter`] as the
//! completion handler. It then exports or discards the staged artifact.
//! Collaborators are injected, so the same driver runs against curl and the
//! filesystem or against in-memory fakes.

mod naming;
mod state;
mod surface;

pub use naming::{artifact_name, artifact_name_now, ARTIFACT_EXT};
pub use state::SessionState;
pub use surface::ProgressSurface;

use std::path::PathBuf;
use std::time::Instant;

use url::Url;

use crate::export::Exporter;
use crate::fetch::Fetcher;
use crate::manifest::{self, ManifestKind, SegmentList};
use crate::reassembly::ReassemblyWriter;
use crate::retry::{fetch_with_retry, FetchError, RetryPolicy};
use crate::scheduler::{download_segments, ProgressStats, SchedulerOptions};
use crate::storage::{ArtifactFile, ArtifactStore};

/// Staging directory inside the artifact store.
pub const STAGING_DIR: &str = "downloads";

/// Session-scoped settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub max_concurrency: usize,
    /// Manifest and chosen-playlist fetches.
    pub request_retry: RetryPolicy,
    /// Segment fetches.
    pub segment_retry: RetryPolicy,
    pub staging_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 6,
            request_retry: RetryPolicy::request(3),
            segment_retry: RetryPolicy::segment(),
            staging_dir: STAGING_DIR.to_string(),
        }
    }
}

/// How a session ended, when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Exported {
        path: PathBuf,
        segments: usize,
        bytes: u64,
    },
    /// The surface answered cancel after `received` of `total` segments.
    Cancelled { received: usize, total: usize },
    /// The chooser declined; nothing was created.
    Dismissed,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid playlist URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("playlist has no segments -- {url}")]
    EmptyPlaylist { url: String },
    #[error("staging failed: {0:#}")]
    Storage(anyhow::Error),
    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

/// One download session over injected collaborators.
pub struct Session<'a> {
    fetcher: &'a dyn Fetcher,
    store: &'a dyn ArtifactStore,
    exporter: &'a dyn Exporter,
    config: SessionConfig,
}

impl<'a> Session<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        store: &'a dyn ArtifactStore,
        exporter: &'a dyn Exporter,
    ) -> Self {
        Self {
            fetcher,
            store,
            exporter,
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs the whole session for `manifest_url`, reporting to `surface`.
    ///
    /// The surface sees every state transition, ending with exactly one
    /// terminal state.
    pub fn run(
        &self,
        manifest_url: &str,
        surface: &mut dyn ProgressSurface,
    ) -> Result<SessionOutcome, SessionError> {
        let name = artifact_name_now();
        tracing::info!(url = manifest_url, artifact = %name, "session start");

        let result = self.drive(manifest_url, &name, surface);
        let terminal = match &result {
            Ok(SessionOutcome::Exported { .. }) => SessionState::Done,
            Ok(SessionOutcome::Cancelled { .. }) => SessionState::Cancelled,
            Ok(SessionOutcome::Dismissed) => SessionState::Dismissed,
            Err(e) => {
                tracing::warn!(url = manifest_url, "session failed: {}", e);
                SessionState::Failed
            }
        };
        enter(surface, terminal);
        result
    }

    fn drive(
        &self,
        manifest_url: &str,
        name: &str,
        surface: &mut dyn ProgressSurface,
    ) -> Result<SessionOutcome, SessionError> {
        enter(surface, SessionState::FetchingManifest);
        let base = parse_url(manifest_url)?;
        let resp = fetch_with_retry(self.fetcher, manifest_url, &self.config.request_retry)?;

        enter(surface, SessionState::Classifying);
        let (segments, playlist_url) = match manifest::classify(&resp.text(), &base) {
            ManifestKind::Media(list) => {
                enter(surface, SessionState::BuildingSegmentList);
                (list, manifest_url.to_string())
            }
            ManifestKind::Master(variants) => {
                tracing::debug!(variants = variants.len(), "master playlist");
                enter(surface, SessionState::AwaitingUserChoice);
                let Some(chosen) = surface.choose_variant(&variants) else {
                    tracing::info!("variant choice dismissed");
                    return Ok(SessionOutcome::Dismissed);
                };
                enter(surface, SessionState::BuildingSegmentList);
                let chosen_base = parse_url(&chosen)?;
                let resp = fetch_with_retry(self.fetcher, &chosen, &self.config.request_retry)?;
                (manifest::parse_media_playlist(&resp.text(), &chosen_base), chosen)
            }
        };
        if segments.is_empty() {
            return Err(SessionError::EmptyPlaylist { url: playlist_url });
        }

        enter(surface, SessionState::Downloading);
        self.download(&segments, name, surface)
    }

    fn download(
        &self,
        segments: &SegmentList,
        name: &str,
        surface: &mut dyn ProgressSurface,
    ) -> Result<SessionOutcome, SessionError> {
        let total = segments.len();
        let dir = self
            .store
            .create_dir(&self.config.staging_dir)
            .map_err(SessionError::Storage)?;
        let mut file = dir.create_file(name).map_err(SessionError::Storage)?;
        let sink = match file.open_writable() {
            Ok(s) => s,
            Err(e) => {
                discard(file.as_mut());
                return Err(SessionError::Storage(e));
            }
        };

        let opts = SchedulerOptions {
            max_concurrency: self.config.max_concurrency,
            retry: self.config.segment_retry,
        };
        let mut writer = ReassemblyWriter::new(sink, total);
        let started = Instant::now();
        let mut received = 0usize;
        let mut bytes_received = 0u64;
        let mut write_error = None;

        let result = download_segments(self.fetcher, segments, &opts, |payload| {
            received += 1;
            bytes_received += payload.bytes.len() as u64;
            let stats = ProgressStats {
                segments_received: received,
                segment_count: total,
                bytes_received,
                elapsed_secs: started.elapsed().as_secs_f64(),
            };
            if !surface.on_progress(&stats) {
                return false;
            }
            match writer.accept(payload) {
                Ok(_) => true,
                Err(e) => {
                    write_error = Some(e);
                    false
                }
            }
        });

        enter(surface, SessionState::Finalizing);
        let written = writer.written();
        let bytes = writer.written_bytes();
        let mut sink = writer.into_sink();
        let closed = sink.close();
        drop(sink);

        if let Some(e) = write_error {
            discard(file.as_mut());
            return Err(SessionError::Storage(e));
        }
        match result {
            Err(e) => {
                discard(file.as_mut());
                Err(e.into())
            }
            Ok(false) => {
                discard(file.as_mut());
                tracing::info!(received, total, "session cancelled");
                Ok(SessionOutcome::Cancelled { received, total })
            }
            Ok(true) => {
                if let Err(e) = closed {
                    discard(file.as_mut());
                    return Err(SessionError::Storage(e));
                }
                debug_assert_eq!(written, total);
                let exported = file
                    .read_blob()
                    .map_err(SessionError::Storage)
                    .and_then(|mut blob| {
                        self.exporter
                            .export(&mut blob, file.name())
                            .map_err(SessionError::Export)
                    });
                // The staging copy is released whether or not export worked.
                discard(file.as_mut());
                let path = exported?;
                tracing::info!(segments = total, bytes, path = %path.display(), "session done");
                Ok(SessionOutcome::Exported {
                    path,
                    segments: total,
                    bytes,
                })
            }
        }
    }
}

fn parse_url(url: &str) -> Result<Url, SessionError> {
    Url::parse(url).map_err(|source| SessionError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

fn enter(surface: &mut dyn ProgressSurface, state: SessionState) {
    tracing::debug!(state = %state, "session state");
    surface.on_state(state);
}

fn discard(file: &mut dyn ArtifactFile) {
    if let Err(e) = file.discard() {
        tracing::warn!(artifact = file.name(), "failed to discard staged artifact: {:#}", e);
    }
}
