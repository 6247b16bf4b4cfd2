//! Form validation
//!
//! Checkout only checks presence: name, phone, address and city must contain
//! something other than whitespace. The contact form also wants a real email
//! address. Values are trimmed before checking.

use crate::core::error::{FieldValidationError, ValidationError};
use crate::entities::order::Customer;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

const CHECKOUT_FIELDS: [&str; 4] = ["name", "phone", "address", "city"];
const CONTACT_FIELDS: [&str; 3] = ["name", "email", "message"];

/// Flatten validator output into our error type, ordered as the form lays
/// the fields out
pub(crate) fn field_errors(errors: &ValidationErrors, order: &[&str]) -> ValidationError {
    let mut fields: Vec<FieldValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| FieldValidationError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            })
        })
        .collect();
    fields.sort_by_key(|f| {
        order
            .iter()
            .position(|name| *name == f.field)
            .unwrap_or(order.len())
    });
    ValidationError::FieldErrors(fields)
}

/// What the shopper chose on the payment step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentChoice {
    #[default]
    CashOnDelivery,
    BankTransfer {
        #[serde(default)]
        transaction_ref: Option<String>,
        #[serde(default)]
        proof_image: Option<String>,
    },
}

/// Checkout form as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[serde(default)]
    pub payment: PaymentChoice,

    #[serde(default)]
    pub note: Option<String>,
}

impl CheckoutForm {
    /// Copy with every text field trimmed and blank optionals dropped
    pub fn trimmed(&self) -> Self {
        let clean = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let payment = match &self.payment {
            PaymentChoice::CashOnDelivery => PaymentChoice::CashOnDelivery,
            PaymentChoice::BankTransfer {
                transaction_ref,
                proof_image,
            } => PaymentChoice::BankTransfer {
                transaction_ref: clean(transaction_ref),
                proof_image: clean(proof_image),
            },
        };
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            payment,
            note: clean(&self.note),
        }
    }

    /// Check that every required field is present
    ///
    /// Reports all missing fields at once, in form order.
    pub fn check(&self) -> Result<(), ValidationError> {
        self.trimmed()
            .validate()
            .map_err(|errors| field_errors(&errors, &CHECKOUT_FIELDS))
    }

    /// The customer block of the order
    pub fn customer(&self) -> Customer {
        let form = self.trimmed();
        Customer {
            name: form.name,
            phone: form.phone,
            address: form.address,
            city: form.city,
        }
    }
}

/// Message sent from the contact page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "A valid email address is required"))]
    pub email: String,

    #[serde(default)]
    pub subject: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

impl ContactForm {
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        self.trimmed()
            .validate()
            .map_err(|errors| field_errors(&errors, &CONTACT_FIELDS))
    }
}
