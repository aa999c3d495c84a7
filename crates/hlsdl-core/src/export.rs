//! Hand-off of a finished artifact to its final location.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::url_model::sanitize_filename;

/// Receives a completed artifact.
pub trait Exporter: Send + Sync {
    /// Copies `blob` out under (a variant of) `suggested_name` and returns the
    /// path it was written to.
    fn export(&self, blob: &mut dyn Read, suggested_name: &str) -> Result<PathBuf>;
}

/// Exports into a download directory, never overwriting an existing file.
///
/// When `name.ext` is taken, `name (1).ext`, `name (2).ext`, … are tried.
#[derive(Debug, Clone)]
pub struct DirExporter {
    dir: PathBuf,
}

impl DirExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$XDG_DOWNLOAD_DIR`-style default: `~/Downloads`, or the current
    /// directory when no home is known.
    pub fn default_dir() -> PathBuf {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Downloads"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn create_unique(&self, name: &str) -> Result<(PathBuf, File)> {
        let (stem, ext) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
            _ => (name, ""),
        };
        for n in 0u32.. {
            let candidate = if n == 0 {
                self.dir.join(name)
            } else {
                self.dir.join(format!("{} ({}){}", stem, n, ext))
            };
            match File::options().write(true).create_new(true).open(&candidate) {
                Ok(f) => return Ok((candidate, f)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to create {}", candidate.display()))
                }
            }
        }
        anyhow::bail!("no free filename for {} in {}", name, self.dir.display())
    }
}

impl Exporter for DirExporter {
    fn export(&self, blob: &mut dyn Read, suggested_name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create download dir: {}", self.dir.display()))?;
        let mut name = sanitize_filename(suggested_name);
        if name.is_empty() {
            name = "download.bin".to_string();
        }
        let (path, mut file) = self.create_unique(&name)?;
        if let Err(e) = io::copy(blob, &mut file).and_then(|_| file.sync_all()) {
            let _ = std::fs::remove_file(&path);
            return Err(e).with_context(|| format!("export to {} failed", path.display()));
        }
        tracing::info!(path = %path.display(), "exported artifact");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn writes_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exp = DirExporter::new(dir.path().join("out"));
        let path = exp.export(&mut Cursor::new(b"payload".to_vec()), "a.bin").unwrap();
        assert_eq!(path, dir.path().join("out/a.bin"));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.ts"), b"old").unwrap();
        let exp = DirExporter::new(dir.path());
        let p1 = exp.export(&mut Cursor::new(b"one".to_vec()), "clip.ts").unwrap();
        let p2 = exp.export(&mut Cursor::new(b"two".to_vec()), "clip.ts").unwrap();
        assert_eq!(p1, dir.path().join("clip (1).ts"));
        assert_eq!(p2, dir.path().join("clip (2).ts"));
        assert_eq!(std::fs::read(dir.path().join("clip.ts")).unwrap(), b"old");
        assert_eq!(std::fs::read(p2).unwrap(), b"two");
    }

    #[test]
    fn suggested_name_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let exp = DirExporter::new(dir.path());
        let p = exp.export(&mut Cursor::new(Vec::new()), "../escape.bin").unwrap();
        assert_eq!(p, dir.path().join("escape.bin"));
        let p = exp.export(&mut Cursor::new(Vec::new()), "..").unwrap();
        assert_eq!(p, dir.path().join("download.bin"));
    }
}
