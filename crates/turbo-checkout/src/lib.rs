//! Checkout pricing and order submission for TurboCommerce storefronts.
//!
//! This crate turns a cart, a guest address, a fetched shipping quote and an
//! optional voucher into one validated, priced order, submits it, and routes
//! the shopper based on the backend's response:
//!
//! - **Cart**: cart lines read from an external store and projected for display
//! - **Address**: guest contact form and the province → city → district cascade
//! - **Shipping**: courier selection and quote resolution
//! - **Pricing**: subtotal, voucher discount, shipping cost and grand total
//! - **Order**: readiness, payload, response decoding and the submission machine
//! - **Session**: [`session::CheckoutSession`] wiring everything together
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_checkout::prelude::*;
//!
//! let mut session = CheckoutSession::open(CheckoutConfig::default(), services).await?;
//! session.apply(AddressEvent::FullNameChanged("Siti Rahma".into()))?;
//! // ... remaining contact fields ...
//! session.choose_courier(CourierCode::new("jne")).await?;
//!
//! let pricing = session.pricing()?;
//! println!("Total: {}", pricing.grand_total.display());
//!
//! match session.submit().await {
//!     Ok(outcome) => println!("placed: {:?}", outcome),
//!     Err(err) => eprintln!("{}", err.user_messages().join("\n")),
//! }
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod address;
pub mod cart;
pub mod config;
pub mod order;
pub mod pricing;
pub mod session;
pub mod shipping;

#[cfg(test)]
mod testing;

pub use error::{CheckoutError, ConfigError, ServiceError, SubmitError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CheckoutError, ConfigError, ServiceError, SubmitError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::config::{CheckoutConfig, CourierConfig, ParcelDefaults};

    // Cart
    pub use crate::cart::{CartLine, CartLineKey, CartStore, CartView, InMemoryCartStore};

    // Address
    pub use crate::address::{
        AddressEvent, AddressState, GuestContact, Region, RegionLevel, RegionLookup,
        RegionSelection, ShippingImpact,
    };

    // Shipping
    pub use crate::shipping::{
        QuoteCompletion, QuoteRequest, ShippingQuoteOption, ShippingQuoteService,
    };

    // Pricing
    pub use crate::pricing::{DiscountPolicy, PricingFlag, PricingSnapshot, Voucher, VoucherKind};

    // Order
    pub use crate::order::{
        MissingRequirement, NavigationEffect, Navigator, Notice, OrderOutcome, OrderResponse,
        OrderService, OrderSubmission, PaymentType, Route, SubmissionState,
    };

    // Session
    pub use crate::session::{CheckoutSession, CheckoutSummary, Collaborators};
}
