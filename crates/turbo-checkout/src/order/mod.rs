//! Order submission module.
//!
//! Readiness checks, the outbound order payload, decoding of the backend's
//! response into an [`OrderOutcome`], and the state machine tying them together.

mod machine;
mod readiness;
mod response;
mod service;
mod submission;

pub use machine::{SubmissionMachine, SubmissionState};
pub use readiness::{missing_requirements, MissingRequirement};
pub use response::{
    interpret_response, NavigationEffect, Notice, OrderOutcome, OrderResponse, OrderResponseData,
    Route,
};
pub use service::{Navigator, OrderService};
pub use submission::{
    GuestDetails, OrderItem, OrderSubmission, PaymentType, ShipmentDescriptor, ShipmentGroup,
};
