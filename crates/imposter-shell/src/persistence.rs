//! On-disk key-value store.
//!
//! Uses bincode for a compact snapshot of the whole map. Every mutation
//! rewrites the snapshot through a temp file and a rename, so a crash
//! leaves either the old file or the new one. An unreadable snapshot is
//! logged and replaced by an empty store.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bincode::Options;
use imposter_logic::error::StoreError;
use imposter_logic::store::{KeyValueStore, StoredValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version number for the store file format (increment when format changes)
const STORE_VERSION: u32 = 1;

/// Serializable snapshot of every stored key
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Store format version
    pub version: u32,
    pub entries: BTreeMap<String, StoredValue>,
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),

    #[error("Store version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

impl From<SaveError> for StoreError {
    fn from(e: SaveError) -> Self {
        match e {
            SaveError::Io(io) => StoreError::Io(io),
            other => StoreError::Serialization(other.to_string()),
        }
    }
}

/// Write all entries to a writer
pub fn save_entries<W: Write>(
    writer: W,
    entries: &BTreeMap<String, StoredValue>,
) -> Result<(), SaveError> {
    #[derive(Serialize)]
    struct SnapshotRef<'a> {
        version: u32,
        entries: &'a BTreeMap<String, StoredValue>,
    }

    bincode::serialize_into(
        writer,
        &SnapshotRef {
            version: STORE_VERSION,
            entries,
        },
    )?;
    Ok(())
}

/// Read all entries from a reader.
///
/// Decoding is limited to the bytes actually read, so a corrupt length
/// prefix fails instead of allocating.
pub fn load_entries<R: Read>(mut reader: R) -> Result<BTreeMap<String, StoredValue>, SaveError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let snapshot: StoreSnapshot = bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(bytes.len() as u64)
        .deserialize(&bytes)?;

    if snapshot.version != STORE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: STORE_VERSION,
            found: snapshot.version,
        });
    }

    Ok(snapshot.entries)
}

/// Key-value store persisted to a single file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, StoredValue>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that cannot be read or
    /// decoded is logged and also treated as empty; it is overwritten on
    /// the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match File::open(&path) {
            Ok(file) => match load_entries(BufReader::new(file)) {
                Ok(entries) => {
                    log::debug!("Loaded {} keys from {}", entries.len(), path.display());
                    entries
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No store at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Cannot open store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling of the store file used for atomic writes: `<file name>.tmp`.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn flush(&self) -> Result<(), SaveError> {
        let tmp = self.tmp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            save_entries(&mut writer, &self.entries)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush().map_err(StoreError::from)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush().map_err(StoreError::from)?;
        }
        Ok(())
    }
}
