//! Macros for reducing boilerplate when defining stored records

/// Implement [`Record`](crate::core::record::Record) for a struct whose id
/// lives in a `String` field.
///
/// # Example
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize)]
/// pub struct Slide {
///     pub id: String,
///     pub title: String,
/// }
///
/// impl_record!(Slide, id);
/// ```
#[macro_export]
macro_rules! impl_record {
    ($type:ty, $field:ident) => {
        impl $crate::core::record::Record for $type {
            fn record_id(&self) -> &str {
                &self.$field
            }
        }
    };
}

/// Generate a fresh record id (UUID v4 as a string)
#[macro_export]
macro_rules! new_record_id {
    () => {
        ::uuid::Uuid::new_v4().to_string()
    };
}
