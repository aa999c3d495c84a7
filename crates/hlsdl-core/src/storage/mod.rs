//! Staging storage for the assembled artifact.
//!
//! The session only needs a sequential-write sink and, after close, a readable
//! blob. [`FsArtifactStore`] stages under a directory on disk (writing to a
//! `.part` file and renaming on close); [`MemoryArtifactStore`] keeps
//! everything in memory.

mod fs;
mod memory;

pub use fs::FsArtifactStore;
pub use memory::MemoryArtifactStore;

use anyhow::Result;
use std::io::Read;

/// Temporary file suffix used before the rename on close.
pub const TEMP_SUFFIX: &str = ".part";

/// Root of a staging area.
pub trait ArtifactStore: Send + Sync {
    /// Create (or reuse) a directory named `name`.
    fn create_dir(&self, name: &str) -> Result<Box<dyn ArtifactDir>>;
}

pub trait ArtifactDir: Send {
    /// Create an empty file named `name`, replacing any existing one.
    fn create_file(&self, name: &str) -> Result<Box<dyn ArtifactFile>>;
}

/// Handle on one staged file.
pub trait ArtifactFile: Send {
    fn name(&self) -> &str;

    /// Sequential append sink. Only one sink per file is expected.
    fn open_writable(&mut self) -> Result<Box<dyn ArtifactSink>>;

    /// Readable view of the content. Valid after the sink was closed.
    fn read_blob(&self) -> Result<Box<dyn Read + Send>>;

    /// Drop the staged content, closed or not.
    fn discard(&mut self) -> Result<()>;
}

/// Append-only byte sink.
pub trait ArtifactSink: Send {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Flush and close. Writes after close fail.
    fn close(&mut self) -> Result<()>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for Box<S> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Path for the temp file: appends `.part` (e.g. `a.bin` → `a.bin.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}
