//! Shipping module.
//!
//! Contains courier quote types, the quote service collaborator and the
//! resolver that decides when quotes are fetched and which one is chosen.

mod quote;
mod resolver;

pub use quote::{Dimensions, QuoteRequest, ShippingQuoteOption, ShippingQuoteService};
pub use resolver::{QuoteCompletion, QuoteTicket, QuoteUnavailable, ShippingResolver};
