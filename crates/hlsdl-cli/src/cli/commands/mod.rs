//! CLI command handlers, one file per command.

mod checksum;
mod get;
mod hls;
mod records;

pub use checksum::run_checksum;
pub use get::run_get;
pub use hls::run_hls;
pub use records::run_records;

use hlsdl_core::config::HlsdlConfig;
use hlsdl_core::export::DirExporter;
use std::path::{Path, PathBuf};

/// `--output-dir`, else `download_dir` from config, else `~/Downloads`.
pub(crate) fn download_dir(flag: Option<&Path>, cfg: &HlsdlConfig) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| cfg.download_dir.clone())
        .unwrap_or_else(DirExporter::default_dir)
}
