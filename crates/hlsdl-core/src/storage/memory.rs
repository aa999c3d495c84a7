//! In-memory staging, for tests and embedders without a filesystem.

use anyhow::Result;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex, PoisonError};

use super::{ArtifactDir, ArtifactFile, ArtifactSink, ArtifactStore};

#[derive(Debug, Default)]
struct Shared {
    files: HashMap<String, Vec<u8>>,
    write_counts: HashMap<String, usize>,
    closed: Vec<String>,
    discarded: Vec<String>,
}

/// Cloneable handle on an in-memory staging area. Keys are `dir/name`.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        f(&mut self.shared.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current content of `dir/name`, if it exists.
    pub fn content(&self, key: &str) -> Option<Vec<u8>> {
        self.with(|s| s.files.get(key).cloned())
    }

    /// Number of `write` calls made to `dir/name`.
    pub fn write_count(&self, key: &str) -> usize {
        self.with(|s| s.write_counts.get(key).copied().unwrap_or(0))
    }

    pub fn closed(&self) -> Vec<String> {
        self.with(|s| s.closed.clone())
    }

    pub fn discarded(&self) -> Vec<String> {
        self.with(|s| s.discarded.clone())
    }

    /// Keys of files that currently exist.
    pub fn keys(&self) -> Vec<String> {
        self.with(|s| s.files.keys().cloned().collect())
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn create_dir(&self, name: &str) -> Result<Box<dyn ArtifactDir>> {
        Ok(Box::new(MemoryDir {
            store: self.clone(),
            name: name.to_string(),
        }))
    }
}

struct MemoryDir {
    store: MemoryArtifactStore,
    name: String,
}

impl ArtifactDir for MemoryDir {
    fn create_file(&self, name: &str) -> Result<Box<dyn ArtifactFile>> {
        let key = format!("{}/{}", self.name, name);
        self.store.with(|s| {
            s.files.insert(key.clone(), Vec::new());
            s.write_counts.insert(key.clone(), 0);
        });
        Ok(Box::new(MemoryFile {
            store: self.store.clone(),
            name: name.to_string(),
            key,
        }))
    }
}

struct MemoryFile {
    store: MemoryArtifactStore,
    name: String,
    key: String,
}

impl ArtifactFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn open_writable(&mut self) -> Result<Box<dyn ArtifactSink>> {
        Ok(Box::new(MemorySink {
            store: self.store.clone(),
            key: self.key.clone(),
            closed: false,
        }))
    }

    fn read_blob(&self) -> Result<Box<dyn Read + Send>> {
        let bytes = self
            .store
            .content(&self.key)
            .ok_or_else(|| anyhow::anyhow!("no such artifact: {}", self.key))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn discard(&mut self) -> Result<()> {
        let key = self.key.clone();
        self.store.with(|s| {
            s.files.remove(&key);
            s.discarded.push(key);
        });
        Ok(())
    }
}

struct MemorySink {
    store: MemoryArtifactStore,
    key: String,
    closed: bool,
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if self.closed {
            anyhow::bail!("write after close: {}", self.key);
        }
        self.store.with(|s| {
            s.files.entry(self.key.clone()).or_default().extend_from_slice(bytes);
            *s.write_counts.entry(self.key.clone()).or_default() += 1;
        });
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            let key = self.key.clone();
            self.store.with(|s| s.closed.push(key));
        }
        Ok(())
    }
}
