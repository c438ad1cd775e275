//! Versioned JSON store files.
//!
//! Every persisted table is one file holding an envelope
//! `{"schema": <name>, "version": <n>, "data": <payload>}`.
//!
//! Writes go to a temp file that is renamed over the target while an
//! exclusive advisory lock is held on a sidecar `<file>.lock`; reads take the
//! shared lock. Files written before envelopes existed (a bare payload) are
//! handed to the store's migration with version 0. Unreadable files are moved
//! aside as `<file>.corrupt` and the store starts empty.

use crate::error::{Result, ScoutError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    schema: &'a str,
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    schema: String,
    version: u32,
    data: serde_json::Value,
}

/// One store file with its schema name and current version
#[derive(Debug, Clone)]
pub struct StoreFile {
    path: PathBuf,
    schema: &'static str,
    version: u32,
}

impl StoreFile {
    pub fn new(path: impl Into<PathBuf>, schema: &'static str, version: u32) -> Self {
        Self {
            path: path.into(),
            schema,
            version,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the payload.
    ///
    /// `migrate` receives the on-disk version (0 for legacy bare files) and the
    /// raw payload for anything older than the current version. A file from a
    /// newer version is an error rather than being overwritten later.
    pub fn load<T, F>(&self, migrate: F) -> Result<T>
    where
        T: DeserializeOwned + Default,
        F: FnOnce(u32, serde_json::Value) -> Result<T>,
    {
        if !self.path.exists() {
            return Ok(T::default());
        }

        let content = {
            let lock_file = self.open_lock_file()?;
            let lock = fd_lock::RwLock::new(lock_file);
            let _guard = lock
                .read()
                .map_err(|e| ScoutError::storage(&self.path, format!("shared lock: {}", e)))?;
            fs::read_to_string(&self.path)
                .map_err(|e| ScoutError::storage(&self.path, e.to_string()))?
        };

        let raw: serde_json::Value = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(e) => return self.quarantine(&format!("not JSON: {}", e)),
        };

        let parsed = if is_envelope(&raw) {
            let env: EnvelopeIn = match serde_json::from_value(raw) {
                Ok(env) => env,
                Err(e) => return self.quarantine(&format!("bad envelope: {}", e)),
            };
            if env.schema != self.schema {
                return self.quarantine(&format!(
                    "schema '{}' where '{}' was expected",
                    env.schema, self.schema
                ));
            }
            if env.version > self.version {
                return Err(ScoutError::SchemaVersion {
                    store: self.schema,
                    found: env.version,
                    supported: self.version,
                });
            }
            if env.version == self.version {
                serde_json::from_value(env.data).map_err(ScoutError::from)
            } else {
                debug!(store = self.schema, from = env.version, "migrating store");
                migrate(env.version, env.data)
            }
        } else {
            debug!(store = self.schema, "migrating legacy store file");
            migrate(0, raw)
        };

        match parsed {
            Ok(data) => Ok(data),
            Err(ScoutError::Json(e)) => self.quarantine(&format!("payload: {}", e)),
            Err(e) => Err(e),
        }
    }

    /// Atomically replace the file with `data`
    pub fn save<T: Serialize>(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ScoutError::storage(parent, e.to_string()))?;
            }
        }

        let body = serde_json::to_string_pretty(&EnvelopeOut {
            schema: self.schema,
            version: self.version,
            data,
        })?;

        let lock_file = self.open_lock_file()?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock
            .write()
            .map_err(|e| ScoutError::storage(&self.path, format!("exclusive lock: {}", e)))?;

        let temp_path = self.sidecar("tmp");
        let written = (|| -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(ScoutError::storage(&self.path, e.to_string()));
        }
        Ok(())
    }

    fn open_lock_file(&self) -> Result<File> {
        let lock_path = self.sidecar("lock");
        OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| ScoutError::storage(&lock_path, e.to_string()))
    }

    fn sidecar(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn quarantine<T: Default>(&self, reason: &str) -> Result<T> {
        let aside = self.sidecar("corrupt");
        warn!(
            store = self.schema,
            path = %self.path.display(),
            reason,
            "store file unreadable, moving aside and starting empty"
        );
        fs::rename(&self.path, &aside).map_err(|e| ScoutError::storage(&self.path, e.to_string()))?;
        Ok(T::default())
    }
}

fn is_envelope(raw: &serde_json::Value) -> bool {
    raw.as_object()
        .map(|o| o.contains_key("schema") && o.contains_key("version") && o.contains_key("data"))
        .unwrap_or(false)
}

/// Migration for stores whose payload shape has not changed since version 0
pub fn migrate_as_is<T: DeserializeOwned>(_from: u32, raw: serde_json::Value) -> Result<T> {
    Ok(serde_json::from_value(raw)?)
}
