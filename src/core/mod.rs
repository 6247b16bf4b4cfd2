//! Core module containing the error hierarchy, events and shared traits

pub mod error;
pub mod events;
pub mod query;
pub mod record;
pub mod service;
pub mod validation;

pub use error::{StorefrontError, StorefrontResult};
pub use events::{ChangeEvent, EventBus, EventEnvelope};
pub use query::{CatalogQuery, Page, PaginationMeta, SortOrder};
pub use record::Record;
pub use service::KvBackend;
pub use validation::{CheckoutForm, ContactForm, PaymentChoice};
