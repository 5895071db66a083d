//! Durable file-backed store.
//!
//! The whole key-value map is written as one MessagePack document,
//! LZ4-compressed with a SHA256 checksum appended, and replaced atomically
//! via a temp file rename. An unreadable or corrupted file opens as an empty
//! store so a damaged save never blocks a new session.

use std::collections::HashMap;
use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StorageError;
use super::{KeyValueStore, STORE_VERSION};
use crate::clock::now_ms;

#[derive(Serialize, Deserialize, Debug, Clone)]
struct StoreDoc {
    /// Store format version for migration
    version: u32,

    /// Last write timestamp (unix milliseconds)
    timestamp: u64,

    /// All persisted key-value pairs
    entries: HashMap<String, String>,
}

fn encode(entries: &HashMap<String, String>) -> Result<Vec<u8>, StorageError> {
    let doc = StoreDoc { version: STORE_VERSION, timestamp: now_ms(), entries: entries.clone() };

    let msgpack = to_vec_named(&doc)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

fn decode(bytes: &[u8]) -> Result<HashMap<String, String>, StorageError> {
    // Minimum: LZ4 size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(StorageError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    if &hasher.finalize()[..] != checksum_bytes {
        return Err(StorageError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| StorageError::Decompression)?;
    let doc: StoreDoc = from_slice(&msgpack)?;

    if doc.version > STORE_VERSION {
        return Err(StorageError::VersionMismatch { found: doc.version, expected: STORE_VERSION });
    }

    Ok(doc.entries)
}

/// File-backed [`KeyValueStore`] with write-through persistence.
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open a store file, falling back to an empty store when the file is
    /// missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(Some(entries)) => entries,
            Ok(None) => HashMap::new(),
            Err(err) => {
                log::warn!("discarding corrupted store {:?}: {}", path, err);
                HashMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<Option<HashMap<String, String>>, StorageError> {
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        Ok(Some(decode(&data)?))
    }

    fn write_entries(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = encode(&self.entries)?;

        // Atomic save: write to temp file, then rename
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, &self.path)?;

        log::debug!("saved {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }

    fn flush(&self) {
        if let Err(err) = self.write_entries() {
            log::warn!("store write to {:?} failed, change lost: {}", self.path, err);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}
