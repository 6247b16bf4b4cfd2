//! Record trait shared by every element stored in a list collection

use serde::Serialize;
use serde::de::DeserializeOwned;

/// An element of a list collection (orders, products, reviews, ...).
///
/// Records are identified by an opaque string id. Repositories use it for
/// lookup, upsert and removal; nothing else about the record is assumed.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The identifier used for lookup within its collection
    fn record_id(&self) -> &str;

    /// Whether this record carries the given id
    fn has_id(&self, id: &str) -> bool {
        self.record_id() == id
    }
}
