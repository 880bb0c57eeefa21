//! File-based image cache

use crate::error::{CacheError, Result};
use crate::types::CacheStats;
use cache_key::CacheKey;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// File extension for cache entries
const ENTRY_EXTENSION: &str = "jpg";

/// Suffix for in-flight writes
const TEMP_SUFFIX: &str = ".tmp";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// An image cache storing one file per key in a directory
pub struct ImageCache {
    /// Directory where cached images are stored
    cache_dir: PathBuf,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

impl ImageCache {
    /// Create a new image cache rooted at `cache_dir`
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
        }
    }

    /// Initialize the cache by ensuring the cache directory exists and
    /// clearing temporary files left by interrupted writes
    pub async fn init(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;
        let removed = self.remove_temp_files().await?;
        info!(cache_dir = ?self.cache_dir, removed_temp_files = removed, "Cache initialized");
        Ok(())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the entry file for `key`
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", key.as_str(), ENTRY_EXTENSION))
    }

    fn temp_path(&self, key: &CacheKey) -> PathBuf {
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.cache_dir.join(format!(
            ".{}.{}-{}{}",
            key.as_str(),
            std::process::id(),
            seq,
            TEMP_SUFFIX
        ))
    }

    /// Check whether a readable entry exists for `key`
    pub async fn exists(&self, key: &CacheKey) -> bool {
        let path = self.entry_path(key);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => fs::File::open(&path).await.is_ok(),
            _ => false,
        }
    }

    /// Read the stored bytes for `key`
    pub async fn read(&self, key: &CacheKey) -> Result<Vec<u8>> {
        let path = self.entry_path(key);
        match fs::read(&path).await {
            Ok(data) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, size = data.len(), "Cache hit");
                Ok(data)
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(key = %key, error = %e, "Failed to read cached file");
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache miss");
                Err(CacheError::NotFound)
            }
        }
    }

    /// Store `data` for `key`, replacing any existing entry
    pub async fn write(&self, key: &CacheKey, data: &[u8]) -> Result<()> {
        let temp_path = self.temp_path(key);

        if let Err(e) = write_file(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Write(Box::new(e)));
        }

        if let Err(e) = fs::rename(&temp_path, self.entry_path(key)).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Write(Box::new(e)));
        }

        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, size = data.len(), "Cached image");
        Ok(())
    }

    /// Remove the entry for `key`
    pub async fn delete(&self, key: &CacheKey) -> Result<()> {
        fs::remove_file(self.entry_path(key)).await?;
        self.deletes.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "Deleted cache entry");
        Ok(())
    }

    /// Get current cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }

    async fn remove_temp_files(&self) -> std::io::Result<usize> {
        let mut removed = 0;
        let mut dir = fs::read_dir(&self.cache_dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            let is_temp = entry
                .file_name()
                .to_str()
                .map(|name| name.starts_with('.') && name.ends_with(TEMP_SUFFIX))
                .unwrap_or(false);
            if is_temp && fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}
