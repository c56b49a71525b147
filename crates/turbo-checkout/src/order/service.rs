//! Order collaborators.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::order::{NavigationEffect, Notice, OrderResponse, OrderSubmission};

/// Remote order endpoint.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn submit(&self, order: &OrderSubmission) -> Result<OrderResponse, ServiceError>;
}

/// Host-side routing and notifications.
pub trait Navigator: Send + Sync {
    /// Perform one navigation step.
    fn apply(&self, effect: &NavigationEffect);

    /// Show a transient message.
    fn notify(&self, notice: Notice);
}
