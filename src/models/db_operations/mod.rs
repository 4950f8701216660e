use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

pub mod config_db_operations;
pub mod kayit_db_operations;

pub const CONFIG_FILE: &str = "config.json";
pub const KAYITLAR_FILE: &str = "kayitlar.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serde JSON error in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Checklist '{0}' has no items")]
    EmptyChecklist(String),
}

/// Handle to the two JSON documents under the data directory.
///
/// Nothing is cached: every call goes back to disk. Read-modify-write cycles on
/// either file hold `write_lock` so that concurrent requests cannot drop each
/// other's updates, and every write lands through a temp file + rename.
pub struct DataStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl DataStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        DataStore {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn kayitlar_path(&self) -> PathBuf {
        self.data_dir.join(KAYITLAR_FILE)
    }

    pub(crate) fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| {
            log::error!("Data store write lock was poisoned! Recovering lock.");
            poisoned.into_inner()
        })
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, body).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(io_err)
}
