//! Checkout error types.

use thiserror::Error;

use crate::order::MissingRequirement;

/// Errors raised by the local checkout logic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A child region was chosen before its parent.
    #[error("Cannot select {level} before its parent region")]
    RegionOutOfOrder { level: &'static str },

    /// Courier not in the configured catalog.
    #[error("Unknown courier: {0}")]
    UnknownCourier(String),

    /// Shipping option not in the current quote list.
    #[error("Shipping option not available: {code} {service}")]
    UnknownShippingOption { code: String, service: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CheckoutError {
    fn from(e: serde_json::Error) -> Self {
        CheckoutError::SerializationError(e.to_string())
    }
}

/// Errors returned by external collaborators (region lookup, quotes, orders, cart store).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Failed to reach the service.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success status from the service.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// Failed to decode the service payload.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Decode(e.to_string())
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not read the config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error.
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse error.
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Config parsed but is not usable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Message shown for any failure the user can only retry.
pub const RETRY_MESSAGE: &str = "We couldn't place your order. Please try again.";

/// Typed failure of an order submission.
///
/// Everything that can go wrong during `submit` lands here; collaborator
/// errors never reach the caller unwrapped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// Readiness conditions are unmet.
    #[error("Checkout incomplete: {}", join_codes(.0))]
    Incomplete(Vec<MissingRequirement>),

    /// The submission call failed or returned a non-success status.
    #[error("Order submission failed: {message}")]
    Transport { message: String },

    /// The submission succeeded but the response body could not be routed.
    #[error("Unrecognized order response: {body}")]
    ResponseShapeUnrecognized { body: String },

    /// The session already produced an order.
    #[error("Order already submitted")]
    AlreadySubmitted,

    /// A submission is still outstanding.
    #[error("Order submission in progress")]
    InProgress,

    /// Pricing could not be computed.
    #[error("Pricing failed: {0}")]
    Pricing(#[from] CheckoutError),
}

impl SubmitError {
    /// User-facing messages for this failure.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            SubmitError::Incomplete(missing) => {
                missing.iter().map(|m| m.message().to_string()).collect()
            }
            SubmitError::AlreadySubmitted => {
                vec!["This order has already been placed.".to_string()]
            }
            SubmitError::InProgress => vec!["Your order is being placed.".to_string()],
            SubmitError::Transport { .. }
            | SubmitError::ResponseShapeUnrecognized { .. }
            | SubmitError::Pricing(_) => vec![RETRY_MESSAGE.to_string()],
        }
    }

    /// Whether the user can retry without changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmitError::Transport { .. } | SubmitError::ResponseShapeUnrecognized { .. }
        )
    }
}

fn join_codes(missing: &[MissingRequirement]) -> String {
    missing
        .iter()
        .map(|m| m.code())
        .collect::<Vec<_>>()
        .join(", ")
}
