//! In-memory implementation of KvBackend for tests and ephemeral sessions

use crate::core::KvBackend;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// In-memory key-value store
///
/// Clones share the same map, so several storefront handles built on clones
/// see each other's writes.
#[derive(Clone, Default)]
pub struct InMemoryKv {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate raw values, e.g. to simulate data left by an older build
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl KvBackend for InMemoryKv {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        entries.insert(key.to_string(), value);

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(entries.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entries.keys().cloned().collect())
    }
}
