use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::ApiError;

pub const USERS_KEY: &str = "users";
pub const POMODORO_ROUNDS_KEY: &str = "pomodoroRounds";

pub const FEATURE_NOTES: &str = "notes";
pub const FEATURE_TODOS: &str = "todos";
pub const FEATURE_RECORDINGS: &str = "recordings";
pub const FEATURE_FLASHCARDS: &str = "flashcards";
pub const FEATURE_SESSIONS: &str = "studySessions";
pub const FEATURE_TOOLS_USED: &str = "toolsUsed";

/// Storage key for one user's slice of a feature collection.
pub fn slice_key(feature: &str, user_id: Uuid) -> String {
    format!("{feature}_{user_id}")
}

/// Raw JSON key-value backend. Implementations only move values in and
/// out; typing and atomicity live in [`Kv`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>>;
    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()>;
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// One JSON file per key under the data directory. Writes go through a
/// temp file and a rename so a crash never leaves a half-written file.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", path.display()));
            }
        };
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(Some(value))
    }

    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(&value)?;
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("rename into {}", path.display()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", path.display())),
        }
    }
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

/// Typed view over a [`Store`]. Writes are serialized through one lock
/// so read-modify-write sequences in [`Kv::update`] are atomic.
#[derive(Clone)]
pub struct Kv {
    backend: Arc<dyn Store>,
    write_lock: Arc<Mutex<()>>,
}

impl Kv {
    pub fn new(backend: Arc<dyn Store>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        match self.backend.load(key).await? {
            Some(value) => Ok(Some(
                serde_json::from_value(value).context("decode stored value")?,
            )),
            None => Ok(None),
        }
    }

    pub async fn get_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, ApiError> {
        Ok(self.get(key).await?.unwrap_or_default())
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ApiError> {
        let _guard = self.write_lock.lock().await;
        let value = serde_json::to_value(value).context("encode value")?;
        self.backend.save(key, value).await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), ApiError> {
        let _guard = self.write_lock.lock().await;
        self.backend.remove(key).await?;
        Ok(())
    }

    /// Load the value (or its default), apply `apply`, and persist the
    /// result. Nothing is written when `apply` fails, and the lock is
    /// held throughout so concurrent updates never interleave.
    pub async fn update<T, R, F>(&self, key: &str, apply: F) -> Result<R, ApiError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> Result<R, ApiError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut value: T = match self.backend.load(key).await? {
            Some(raw) => serde_json::from_value(raw).context("decode stored value")?,
            None => T::default(),
        };
        let result = apply(&mut value)?;
        let raw = serde_json::to_value(&value).context("encode value")?;
        self.backend.save(key, raw).await?;
        Ok(result)
    }
}
