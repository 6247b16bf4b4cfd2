//! Backend trait for the key-value store holding every collection

use anyhow::Result;
use async_trait::async_trait;

/// A local string key-value store
///
/// Each logical collection is one key holding JSON text. Implementations only
/// move strings around; encoding and the empty-on-malformed policy live in
/// [`Repository`](crate::storage::Repository).
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Short backend name used in logs and errors
    fn name(&self) -> &'static str;

    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`; returns whether it existed
    async fn remove(&self, key: &str) -> Result<bool>;

    /// All keys currently stored, sorted
    async fn keys(&self) -> Result<Vec<String>>;
}
