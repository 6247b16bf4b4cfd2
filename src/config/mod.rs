//! Configuration loading and management
//!
//! Everything here is display information or policy known before the
//! storefront starts: bank account shown on the payment step, the admin
//! credential pair, shipping fee, list limits and storage backend.

use crate::core::error::{ConfigError, StorefrontResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bank account shown for bank-transfer payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_title: String,
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
}

/// The single admin account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Which key-value backend to open
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    InMemory,
    Lmdb {
        path: String,
    },
}

/// Complete storefront configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub store_name: String,

    /// Prefix printed before amounts on invoices
    pub currency_label: String,

    /// Flat shipping fee added to every order
    pub shipping_fee: Decimal,

    pub bank: BankDetails,
    pub admin: AdminCredentials,

    /// How many products the recently-viewed strip keeps
    pub recently_viewed_limit: usize,

    /// Buffer size of the change-notification channel
    pub event_capacity: usize,

    pub storage: StorageConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store_name: "Storefront".to_string(),
            currency_label: "Rs.".to_string(),
            shipping_fee: Decimal::ZERO,
            bank: BankDetails {
                bank_name: "Meezan Bank".to_string(),
                account_title: "Storefront Traders".to_string(),
                account_number: "0123-4567890123".to_string(),
                iban: Some("PK36MEZN0001230104567890".to_string()),
            },
            admin: AdminCredentials {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            },
            recently_viewed_limit: 8,
            event_capacity: 1024,
            storage: StorageConfig::InMemory,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> StorefrontResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> StorefrontResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.shipping_fee.is_sign_negative() && !self.shipping_fee.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "shipping_fee".to_string(),
                value: self.shipping_fee.to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "admin.username".to_string(),
                value: self.admin.username.clone(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
