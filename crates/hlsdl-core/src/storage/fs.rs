//! Filesystem staging: `<root>/<dir>/<name>.part`, renamed to `<name>` on close.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::{temp_path, ArtifactDir, ArtifactFile, ArtifactSink, ArtifactStore};

/// Staging area rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$XDG_CACHE_HOME/hlsdl`.
    pub fn default_root() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("hlsdl")?;
        Ok(xdg_dirs.get_cache_home())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for FsArtifactStore {
    fn create_dir(&self, name: &str) -> Result<Box<dyn ArtifactDir>> {
        let path = self.root.join(name);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create staging dir: {}", path.display()))?;
        Ok(Box::new(FsDir { path }))
    }
}

struct FsDir {
    path: PathBuf,
}

impl ArtifactDir for FsDir {
    fn create_file(&self, name: &str) -> Result<Box<dyn ArtifactFile>> {
        let final_path = self.path.join(name);
        let temp = temp_path(&final_path);
        for stale in [&final_path, &temp] {
            if stale.exists() {
                std::fs::remove_file(stale)
                    .with_context(|| format!("failed to replace {}", stale.display()))?;
            }
        }
        Ok(Box::new(FsFile {
            name: name.to_string(),
            final_path,
            temp_path: temp,
        }))
    }
}

struct FsFile {
    name: String,
    final_path: PathBuf,
    temp_path: PathBuf,
}

impl ArtifactFile for FsFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_writable(&mut self) -> Result<Box<dyn ArtifactSink>> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .with_context(|| format!("failed to create temp file: {}", self.temp_path.display()))?;
        Ok(Box::new(FsSink {
            writer: Some(BufWriter::new(file)),
            temp_path: self.temp_path.clone(),
            final_path: self.final_path.clone(),
        }))
    }

    fn read_blob(&self) -> Result<Box<dyn Read + Send>> {
        let f = File::open(&self.final_path)
            .with_context(|| format!("failed to open artifact: {}", self.final_path.display()))?;
        Ok(Box::new(f))
    }

    fn discard(&mut self) -> Result<()> {
        for path in [&self.temp_path, &self.final_path] {
            if path.exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
                tracing::debug!(path = %path.display(), "discarded staged artifact");
            }
        }
        Ok(())
    }
}

/// Buffered append writer over the `.part` file.
struct FsSink {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl ArtifactSink for FsSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let w = self
            .writer
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("write after close: {}", self.temp_path.display()))?;
        w.write_all(bytes).context("storage write failed")?;
        Ok(())
    }

    /// Flush, sync, and rename the temp file to its final name.
    fn close(&mut self) -> Result<()> {
        let Some(w) = self.writer.take() else {
            return Ok(());
        };
        let file = w
            .into_inner()
            .map_err(|e| anyhow::anyhow!("storage flush failed: {}", e.error()))?;
        file.sync_all().context("storage sync failed")?;
        drop(file);
        std::fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })?;
        Ok(())
    }
}
