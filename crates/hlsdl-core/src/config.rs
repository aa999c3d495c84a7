use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::capture::{KindFilter, ResourceKind};
use crate::fetch::CurlOptions;
use crate::retry::RetryPolicy;
use crate::session::SessionConfig;

/// Backoff between retries (optional section in config.toml).
/// Without it, retries are dispatched immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Resource kinds listed by `records list` when `--kind` is not given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub kinds: Option<Vec<ResourceKind>>,
}

/// Global configuration loaded from `~/.config/hlsdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HlsdlConfig {
    /// Maximum segment requests in flight per session.
    pub max_concurrency: usize,
    /// Retries for manifest and standalone fetches. Segment retries are fixed.
    pub request_retries: u32,
    pub connect_timeout_secs: u64,
    /// A transfer slower than this many bytes/s for `low_speed_time_secs` fails.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Where finished downloads go (default `~/Downloads`).
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub filter: Option<FilterConfig>,
}

impl Default for HlsdlConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 6,
            request_retries: 3,
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            download_dir: None,
            retry: None,
            filter: None,
        }
    }
}

impl HlsdlConfig {
    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            low_speed_limit: self.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
        }
    }

    fn with_backoff(&self, policy: RetryPolicy) -> RetryPolicy {
        match &self.retry {
            Some(r) => policy.with_backoff(
                Duration::from_secs_f64(r.base_delay_secs.max(0.0)),
                Duration::from_secs(r.max_delay_secs),
            ),
            None => policy,
        }
    }

    pub fn request_retry_policy(&self) -> RetryPolicy {
        self.with_backoff(RetryPolicy::request(self.request_retries))
    }

    pub fn segment_retry_policy(&self) -> RetryPolicy {
        self.with_backoff(RetryPolicy::segment())
    }

    pub fn kind_filter(&self) -> KindFilter {
        match self.filter.as_ref().and_then(|f| f.kinds.as_ref()) {
            Some(kinds) => KindFilter::only(kinds.iter().copied()),
            None => KindFilter::all(),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_concurrency: self.max_concurrency,
            request_retry: self.request_retry_policy(),
            segment_retry: self.segment_retry_policy(),
            ..SessionConfig::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hlsdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HlsdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HlsdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: HlsdlConfig = toml::from_str(&data)?;
    Ok(cfg)
}
