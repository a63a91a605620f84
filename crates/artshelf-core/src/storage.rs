// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Local key-value storage
//
// String blobs addressed by string keys. Callers serialize to JSON
// themselves; the store never looks inside a value.

use crate::types::AppError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Async get/set-by-key blob store
///
/// Every call suspends until the backing store answers. No timeout is
/// applied here.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Write a value, replacing whatever was there
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Delete a key. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;

    /// All keys starting with `prefix`, sorted
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError>;
}

/// File-backed store: one file per key inside a directory
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::FileIo(format!("Failed to create data dir {:?}: {}", dir, e)))?;
        tracing::info!("Local store directory: {:?}", dir);
        Ok(Self { dir })
    }

    /// Open a store in the platform data directory
    pub fn open_default() -> Result<Self, AppError> {
        Self::new(Self::default_dir()?)
    }

    /// Platform data directory for Artshelf
    pub fn default_dir() -> Result<PathBuf, AppError> {
        directories::ProjectDirs::from("com", "artshelf", "Artshelf")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| AppError::FileIo("Could not determine data directory".to_string()))
    }

    /// Directory holding the key files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(encode_key(key))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!("Failed to read '{}': {}", key, e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key);
        // Write-then-rename so readers never observe a half-written value.
        // The temp name contains a '.', which encoded keys never do.
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write '{}': {}", key, e)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to commit '{}': {}", key, e)))
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("Failed to remove '{}': {}", key, e))),
        }
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to list {:?}: {}", self.dir, e)))?;

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to list {:?}: {}", self.dir, e)))?
        {
            let file_name = entry.file_name();
            let Some(key) = file_name.to_str().and_then(decode_key) else {
                continue;
            };
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Escape a key into a portable file name.
///
/// ASCII alphanumerics, '-' and '_' pass through, every other byte
/// becomes `%XX`.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Inverse of [`encode_key`]. `None` for names this store did not write.
fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = name.get(i + 1..i + 3)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' => {
                out.push(b);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(out).ok()
}

/// In-process store for tests and throwaway sessions
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set`/`remove` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every following write fail with a storage error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Storage(format!("Write rejected for '{}'", key)));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.check_writable(key)?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.check_writable(key)?;
        self.entries.lock().await.remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .entries
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_encoding_round_trip() {
        for key in ["favorites", "favorite-42", "comments-a/b c", "..", "ünï"] {
            let encoded = encode_key(key);
            assert!(!encoded.contains('/'));
            assert!(!encoded.contains('.'));
            assert_eq!(decode_key(&encoded).as_deref(), Some(key));
        }
    }

    #[test]
    fn test_decode_rejects_foreign_names() {
        assert_eq!(decode_key("favorite-1.tmp"), None);
        assert_eq!(decode_key("bad%2"), None);
        assert_eq!(decode_key("bad%ZZ"), None);
    }

    #[tokio::test]
    async fn test_file_store_get_set_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path()).unwrap();

        assert_eq!(store.get("favorites").await.unwrap(), None);

        store.set("favorites", "[]").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap().as_deref(), Some("[]"));

        store.set("favorites", "[1]").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap().as_deref(), Some("[1]"));

        store.remove("favorites").await.unwrap();
        assert_eq!(store.get("favorites").await.unwrap(), None);
        store.remove("favorites").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_lists_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path()).unwrap();

        store.set("favorite-b", "{}").await.unwrap();
        store.set("favorite-a/1", "{}").await.unwrap();
        store.set("comments-a", "[]").await.unwrap();
        std::fs::write(dir.path().join("stray.txt"), "x").unwrap();

        let keys = store.keys_with_prefix("favorite-").await.unwrap();
        assert_eq!(keys, vec!["favorite-a/1".to_string(), "favorite-b".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_store_counts_writes() {
        let store = MemoryKeyValueStore::new();
        store.set("a", "1").await.unwrap();
        store.remove("a").await.unwrap();
        let _ = store.get("a").await.unwrap();
        assert_eq!(store.write_count(), 2);

        store.set_fail_writes(true);
        assert!(matches!(store.set("a", "2").await, Err(AppError::Storage(_))));
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
