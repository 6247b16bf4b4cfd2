//! Key-value backends, storage layout and typed repositories

pub mod in_memory;
pub mod keys;
#[cfg(feature = "lmdb")]
pub mod lmdb;
pub mod repository;

pub use in_memory::InMemoryKv;
pub use keys::Collection;
#[cfg(feature = "lmdb")]
pub use lmdb::LmdbKv;
pub use repository::{ChangeFeed, Repository};
