//! Commerce error types.

use thiserror::Error;

use crate::checkout::SubmissionError;

/// Errors that can occur in cart and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// A catalog item with an empty id was handed to the cart.
    ///
    /// This is a caller bug, not a user error.
    #[error("Invalid catalog item: {0}")]
    InvalidItem(String),

    /// Checkout was started with nothing bookable in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Contact details or other input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The booking submission failed. The cart was kept.
    #[error("Booking submission failed: {0}")]
    Submission(#[from] SubmissionError),

    /// The pending submission was cancelled. The cart was kept.
    #[error("Checkout cancelled")]
    CheckoutCancelled,

    /// A price string could not be parsed.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Storage read or write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CommerceError {
    /// Whether the user should be offered a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            CommerceError::Submission(e) => e.is_retryable(),
            CommerceError::CheckoutCancelled => true,
            _ => false,
        }
    }
}

impl From<vatika_cache::CacheError> for CommerceError {
    fn from(e: vatika_cache::CacheError) -> Self {
        match e {
            vatika_cache::CacheError::SerializeError(e) => {
                CommerceError::Serialization(e.to_string())
            }
            other => CommerceError::Persistence(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
