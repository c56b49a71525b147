//! Order response decoding and post-order routing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::{ServiceError, SubmitError};
use crate::ids::{OrderToken, PaymentReference};

/// Envelope returned by the order endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderResponse {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

fn default_status() -> u16 {
    200
}

impl OrderResponse {
    /// Successful response carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            message: None,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// `data` decoded into the shape the backend actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderResponseData {
    /// A bare order token string.
    Token(OrderToken),
    /// A structured payment record.
    Payment {
        reference: PaymentReference,
        payment_link: Option<String>,
    },
}

/// Wire shapes of `data` before blank values are filtered out.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawResponseData {
    Token(String),
    Payment {
        reference: String,
        #[serde(default, rename = "paymentLink")]
        payment_link: Option<String>,
    },
}

impl OrderResponseData {
    /// Decode the payload. `None` when it matches neither shape or carries
    /// a blank token or reference.
    pub fn decode(data: &Value) -> Option<Self> {
        match RawResponseData::deserialize(data).ok()? {
            RawResponseData::Token(token) => {
                let token = token.trim();
                (!token.is_empty()).then(|| OrderResponseData::Token(OrderToken::new(token)))
            }
            RawResponseData::Payment {
                reference,
                payment_link,
            } => {
                let reference = reference.trim();
                if reference.is_empty() {
                    return None;
                }
                let payment_link = payment_link
                    .as_deref()
                    .map(str::trim)
                    .filter(|link| !link.is_empty())
                    .map(str::to_string);
                Some(OrderResponseData::Payment {
                    reference: PaymentReference::new(reference),
                    payment_link,
                })
            }
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderOutcome {
    /// Show the proof-of-payment page for the order.
    RedirectToManualPayment { order_token: OrderToken },
    /// Open the gateway and track the payment by reference.
    RedirectToGateway {
        payment_link: String,
        reference: PaymentReference,
    },
    /// Nothing to pay online, e.g. cash on delivery.
    CompletedNoRedirect,
}

impl From<OrderResponseData> for OrderOutcome {
    fn from(data: OrderResponseData) -> Self {
        match data {
            OrderResponseData::Token(order_token) => {
                OrderOutcome::RedirectToManualPayment { order_token }
            }
            OrderResponseData::Payment {
                reference,
                payment_link: Some(payment_link),
            } => OrderOutcome::RedirectToGateway {
                payment_link,
                reference,
            },
            OrderResponseData::Payment {
                payment_link: None, ..
            } => OrderOutcome::CompletedNoRedirect,
        }
    }
}

impl OrderOutcome {
    /// Navigation the caller should perform, in order.
    pub fn navigation_effects(&self) -> Vec<NavigationEffect> {
        match self {
            OrderOutcome::RedirectToManualPayment { order_token } => {
                vec![NavigationEffect::Navigate(Route::OrderPayment {
                    token: order_token.clone(),
                })]
            }
            OrderOutcome::RedirectToGateway {
                payment_link,
                reference,
            } => vec![
                NavigationEffect::OpenInNewContext {
                    url: payment_link.clone(),
                },
                NavigationEffect::Navigate(Route::OrderStatus {
                    reference: reference.clone(),
                }),
            ],
            OrderOutcome::CompletedNoRedirect => Vec::new(),
        }
    }
}

/// In-app destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// Order detail with payment proof upload.
    OrderPayment { token: OrderToken },
    /// Payment status tracking.
    OrderStatus { reference: PaymentReference },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::OrderPayment { token } => format!("/orders/{}", token),
            Route::OrderStatus { reference } => format!("/orders/status/{}", reference),
        }
    }
}

/// One navigation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum NavigationEffect {
    /// Replace the current view.
    Navigate(Route),
    /// Open an external URL without leaving the current view.
    OpenInNewContext { url: String },
}

/// Transient message for the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    OrderPlaced,
    SubmissionFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::OrderPlaced => "Your order has been placed.",
            Notice::SubmissionFailed => crate::error::RETRY_MESSAGE,
        }
    }
}

/// Map a raw submission result to an outcome or a typed failure.
pub fn interpret_response(
    result: Result<OrderResponse, ServiceError>,
) -> Result<OrderOutcome, SubmitError> {
    let response = result.map_err(|err| {
        warn!(error = %err, "order submission transport failure");
        SubmitError::Transport {
            message: err.to_string(),
        }
    })?;

    if !response.is_success() {
        warn!(status = response.status, message = ?response.message, "order rejected");
        return Err(SubmitError::Transport {
            message: response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }

    match OrderResponseData::decode(&response.data) {
        Some(data) => Ok(OrderOutcome::from(data)),
        None => {
            let body = response.data.to_string();
            error!(body = %body, "unrecognized order response shape");
            Err(SubmitError::ResponseShapeUnrecognized { body })
        }
    }
}
