//! LMDB key-value backend using heed (memory-mapped B-tree)
//!
//! LMDB is embedded, so the store survives restarts without any server. All
//! operations are synchronous and are wrapped in
//! `tokio::task::spawn_blocking` for async compatibility.
//!
//! One named database, `storefront`, maps each collection key to its JSON
//! text.
//!
//! Enable with `--features lmdb`.

use crate::core::KvBackend;
use anyhow::Result;
use async_trait::async_trait;
use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

/// LMDB-backed implementation of [`KvBackend`]
///
/// The `Env` is wrapped in an `Arc` for cheap cloning across tasks.
///
/// # Example
///
/// ```rust,ignore
/// let kv = LmdbKv::open("/var/lib/storefront")?;
/// let store = StorefrontBuilder::new().with_backend(kv).build()?;
/// ```
pub struct LmdbKv {
    env: Arc<Env>,
    db: Database<Str, Str>,
}

impl LmdbKv {
    /// Open (or create) an LMDB environment at `path`
    ///
    /// The map size is a 64 MB address space reservation, far above what a
    /// storefront's collections need.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(64 * 1024 * 1024)
                .max_dbs(4)
                .open(path.as_ref())?
        };

        let mut wtxn = env.write_txn()?;
        let db: Database<Str, Str> = env.create_database(&mut wtxn, Some("storefront"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            db,
        })
    }
}

impl Clone for LmdbKv {
    fn clone(&self) -> Self {
        Self {
            env: Arc::clone(&self.env),
            db: self.db,
        }
    }
}

#[async_trait]
impl KvBackend for LmdbKv {
    fn name(&self) -> &'static str {
        "lmdb"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let env = self.env.clone();
        let db = self.db;
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let rtxn = env.read_txn()?;
            Ok(db.get(&rtxn, &key)?.map(str::to_string))
        })
        .await?
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let env = self.env.clone();
        let db = self.db;
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let mut wtxn = env.write_txn()?;
            db.put(&mut wtxn, &key, &value)?;
            wtxn.commit()?;
            Ok(())
        })
        .await?
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let env = self.env.clone();
        let db = self.db;
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let mut wtxn = env.write_txn()?;
            let existed = db.delete(&mut wtxn, &key)?;
            wtxn.commit()?;
            Ok(existed)
        })
        .await?
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let env = self.env.clone();
        let db = self.db;

        tokio::task::spawn_blocking(move || {
            let rtxn = env.read_txn()?;
            let mut keys = Vec::new();
            for item in db.iter(&rtxn)? {
                let (key, _) = item?;
                keys.push(key.to_string());
            }
            Ok(keys)
        })
        .await?
    }
}
