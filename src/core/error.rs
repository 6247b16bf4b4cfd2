//! Typed error handling for the storefront core
//!
//! Callers match on specific failures instead of dealing with a generic
//! `anyhow::Error`. Every category carries a stable error code so a UI layer
//! can map it to an inline message.
//!
//! # Error Categories
//!
//! - [`OrderError`]: order lookup and status lifecycle failures
//! - [`ValidationError`]: checkout form and input validation
//! - [`StorageError`]: key-value backend failures
//! - [`ConfigError`]: configuration parsing
//! - [`AuthError`]: admin session failures
//!
//! Two conditions are deliberately *not* errors: malformed JSON in the store
//! (read back as an empty collection) and a rejected coupon (a
//! [`CouponOutcome`](crate::pricing::CouponOutcome) value).
//!
//! # Example
//!
//! ```rust,ignore
//! match storefront.orders().advance("ORD-1700000000000").await {
//!     Ok(transition) => println!("{:?}", transition),
//!     Err(StorefrontError::Order(OrderError::NotFound { id })) => {
//!         println!("No order {}", id);
//!     }
//!     Err(e) => eprintln!("{}", e.to_response().message),
//! }
//! ```

use crate::entities::order::OrderStatus;
use serde::Serialize;
use std::fmt;

/// The main error type for the storefront core
#[derive(Debug)]
pub enum StorefrontError {
    /// Order lookup and lifecycle errors
    Order(OrderError),

    /// Input validation errors
    Validation(ValidationError),

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Admin session errors
    Auth(AuthError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for StorefrontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorefrontError::Order(e) => write!(f, "{}", e),
            StorefrontError::Validation(e) => write!(f, "{}", e),
            StorefrontError::Storage(e) => write!(f, "{}", e),
            StorefrontError::Config(e) => write!(f, "{}", e),
            StorefrontError::Auth(e) => write!(f, "{}", e),
            StorefrontError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for StorefrontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorefrontError::Order(e) => Some(e),
            StorefrontError::Validation(e) => Some(e),
            StorefrontError::Storage(e) => Some(e),
            StorefrontError::Config(e) => Some(e),
            StorefrontError::Auth(e) => Some(e),
            StorefrontError::Internal(_) => None,
        }
    }
}

/// Error payload handed to the presentation layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl StorefrontError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            StorefrontError::Order(e) => e.error_code(),
            StorefrontError::Validation(_) => "VALIDATION_ERROR",
            StorefrontError::Storage(_) => "STORAGE_ERROR",
            StorefrontError::Config(_) => "CONFIG_ERROR",
            StorefrontError::Auth(e) => e.error_code(),
            StorefrontError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            StorefrontError::Order(OrderError::NotFound { id }) => {
                Some(serde_json::json!({ "order_id": id }))
            }
            StorefrontError::Order(OrderError::InvalidTransition { id, from, to }) => {
                Some(serde_json::json!({
                    "order_id": id,
                    "from": from,
                    "to": to
                }))
            }
            StorefrontError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Order Errors
// =============================================================================

/// Errors related to orders and their status lifecycle
#[derive(Debug)]
pub enum OrderError {
    /// No order with this id exists
    NotFound { id: String },

    /// The requested status change is not a forward move or a cancellation
    InvalidTransition {
        id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The order is DELIVERED or CANCELLED
    AlreadyTerminal { id: String, status: OrderStatus },

    /// Checkout was attempted with nothing in the cart
    EmptyCart,
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::NotFound { id } => write!(f, "Order '{}' not found", id),
            OrderError::InvalidTransition { id, from, to } => {
                write!(
                    f,
                    "Order '{}' cannot move from {} to {}",
                    id,
                    from.label(),
                    to.label()
                )
            }
            OrderError::AlreadyTerminal { id, status } => {
                write!(f, "Order '{}' is already {}", id, status.label())
            }
            OrderError::EmptyCart => write!(f, "Your cart is empty"),
        }
    }
}

impl std::error::Error for OrderError {}

impl OrderError {
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
            OrderError::AlreadyTerminal { .. } => "ORDER_TERMINAL",
            OrderError::EmptyCart => "EMPTY_CART",
        }
    }
}

impl From<OrderError> for StorefrontError {
    fn from(err: OrderError) -> Self {
        StorefrontError::Order(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// Single field validation error
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldError { field, message } => {
                write!(f, "Validation error for field '{}': {}", field, message)
            }
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Names of the offending fields, in report order
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldError { field, .. } => vec![field.as_str()],
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
            ValidationError::InvalidJson { .. } => Vec::new(),
        }
    }
}

impl From<ValidationError> for StorefrontError {
    fn from(err: ValidationError) -> Self {
        StorefrontError::Validation(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// The backend rejected or failed an operation
    Backend { backend: String, message: String },

    /// A value could not be encoded for storage
    Serialization { key: String, message: String },

    /// Backend not available (feature disabled or not opened)
    Unavailable { backend: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Backend { backend, message } => {
                write!(f, "{} storage error: {}", backend, message)
            }
            StorageError::Serialization { key, message } => {
                write!(f, "Failed to serialize value for '{}': {}", key, message)
            }
            StorageError::Unavailable { backend } => {
                write!(f, "Storage backend '{}' is unavailable", backend)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for StorefrontError {
    fn from(err: StorageError) -> Self {
        StorefrontError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for StorefrontError {
    fn from(err: ConfigError) -> Self {
        StorefrontError::Config(err)
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to the admin session
#[derive(Debug)]
pub enum AuthError {
    /// Username or password did not match
    InvalidCredentials,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }
}

impl From<AuthError> for StorefrontError {
    fn from(err: AuthError) -> Self {
        StorefrontError::Auth(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for StorefrontError {
    fn from(err: serde_json::Error) -> Self {
        StorefrontError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for StorefrontError {
    fn from(err: std::io::Error) -> Self {
        StorefrontError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for StorefrontError {
    fn from(err: serde_yaml::Error) -> Self {
        StorefrontError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for StorefrontError {
    fn from(err: anyhow::Error) -> Self {
        StorefrontError::Internal(err.to_string())
    }
}

/// A specialized Result type for storefront operations
pub type StorefrontResult<T> = Result<T, StorefrontError>;
