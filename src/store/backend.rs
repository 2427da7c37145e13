//! Durable storage collaborators for the document store

use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Blob storage keyed by owner id
pub trait StorageBackend: Send + Sync {
    /// Read the blob for `key`, `None` if it does not exist
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replace the blob for `key`
    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()>;

    /// Remove the blob for `key`, returning whether it existed
    fn remove(&self, key: &str) -> io::Result<bool>;

    fn exists(&self, key: &str) -> bool;

    /// All stored keys
    fn keys(&self) -> io::Result<Vec<String>>;
}

/// One `<owner>.json` file per owner under a base directory
pub struct FsBackend {
    base_dir: PathBuf,
}

const EXTENSION: &str = "json";

impl FsBackend {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        // Directory is created lazily on first write
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\', '\0'])
        {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid owner id: {:?}", key),
            ));
        }
        Ok(self.base_dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.base_dir)?;

        // Write-then-rename so a crash never leaves a half-written record
        let tmp = path.with_extension(format!("{}.tmp", EXTENSION));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)
    }

    fn remove(&self, key: &str) -> io::Result<bool> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(vec![]);
        }

        let mut keys = vec![];
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        Ok(keys)
    }
}

/// In-process backend for tests and ephemeral deployments
#[derive(Default)]
pub struct MemoryBackend {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.blobs().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.blobs().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<bool> {
        Ok(self.blobs().remove(key).is_some())
    }

    fn exists(&self, key: &str) -> bool {
        self.blobs().contains_key(key)
    }

    fn keys(&self) -> io::Result<Vec<String>> {
        Ok(self.blobs().keys().cloned().collect())
    }
}
