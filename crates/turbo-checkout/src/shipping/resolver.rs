//! Shipping quote resolution.

use tracing::{debug, warn};

use crate::address::AddressState;
use crate::config::ParcelDefaults;
use crate::error::{CheckoutError, ServiceError};
use crate::ids::{CourierCode, ShopId};
use crate::shipping::{QuoteRequest, ShippingQuoteOption};

/// Why there is no shipping option to choose.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteUnavailable {
    /// The courier returned no options for this destination.
    NoOptions,
    /// The quote call failed.
    Failed(ServiceError),
}

/// Handle for one outstanding quote fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTicket {
    pub request: QuoteRequest,
    generation: u64,
}

/// What a finished fetch did.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteCompletion {
    /// Options stored; the first one is now selected.
    Selected(ShippingQuoteOption),
    /// No options returned; nothing selected.
    Empty,
    /// The fetch failed; nothing selected.
    Failed,
    /// The destination or courier changed while the fetch was in flight.
    Stale,
}

/// Courier, quote list and chosen option for the active destination.
///
/// Every change to courier or destination bumps the generation, so a fetch
/// started before the change can never overwrite the newer state.
#[derive(Debug, Clone, Default)]
pub struct ShippingResolver {
    courier: Option<CourierCode>,
    quotes: Vec<ShippingQuoteOption>,
    selected: Option<ShippingQuoteOption>,
    active_request: Option<QuoteRequest>,
    unavailable: Option<QuoteUnavailable>,
    generation: u64,
}

impl ShippingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn courier(&self) -> Option<&CourierCode> {
        self.courier.as_ref()
    }

    pub fn quotes(&self) -> &[ShippingQuoteOption] {
        &self.quotes
    }

    pub fn selected(&self) -> Option<&ShippingQuoteOption> {
        self.selected.as_ref()
    }

    /// Request that produced the current quote list.
    pub fn active_request(&self) -> Option<&QuoteRequest> {
        self.active_request.as_ref()
    }

    pub fn unavailable(&self) -> Option<&QuoteUnavailable> {
        self.unavailable.as_ref()
    }

    /// Courier chosen and an option resolved for it.
    pub fn is_resolved(&self) -> bool {
        self.courier.is_some() && self.selected.is_some()
    }

    /// Choose a courier. The selected option is dropped immediately so no
    /// stale price is shown while the new quotes load.
    pub fn select_courier(&mut self, courier: Option<CourierCode>) {
        debug!(courier = ?courier, "courier selected");
        self.courier = courier;
        self.invalidate_quotes();
    }

    /// Destination changed: drop quotes and the chosen option, keep the courier.
    pub fn invalidate_quotes(&mut self) {
        self.generation += 1;
        self.quotes.clear();
        self.selected = None;
        self.active_request = None;
        self.unavailable = None;
    }

    /// Region changed: drop the courier as well.
    pub fn reset_courier(&mut self) {
        self.courier = None;
        self.invalidate_quotes();
    }

    /// Start a fetch if one is eligible.
    ///
    /// Eligible only when the address allows courier choice, a courier is
    /// selected, and there is a destination and an origin to price between.
    /// When ineligible, the quote list is emptied and no ticket is issued.
    pub fn begin(
        &mut self,
        address: &AddressState,
        origin: Option<&ShopId>,
        parcel: &ParcelDefaults,
    ) -> Option<QuoteTicket> {
        let request = match (self.courier.clone(), address.destination_key(), origin) {
            (Some(courier), Some(destination), Some(origin)) if address.can_choose_courier() => {
                QuoteRequest::new(origin.clone(), destination.as_str(), parcel, courier)
            }
            _ => {
                self.invalidate_quotes();
                return None;
            }
        };

        self.generation += 1;
        Some(QuoteTicket {
            request,
            generation: self.generation,
        })
    }

    /// Apply a finished fetch.
    pub fn complete(
        &mut self,
        ticket: QuoteTicket,
        result: Result<Vec<ShippingQuoteOption>, ServiceError>,
    ) -> QuoteCompletion {
        if ticket.generation != self.generation {
            warn!(
                courier = %ticket.request.courier_code,
                destination = %ticket.request.destination_key,
                "discarding stale shipping quotes"
            );
            return QuoteCompletion::Stale;
        }

        match result {
            Ok(options) => {
                let (valid, invalid): (Vec<_>, Vec<_>) =
                    options.into_iter().partition(|o| o.cost >= 0);
                if !invalid.is_empty() {
                    warn!(dropped = invalid.len(), "dropping quotes with negative cost");
                }

                self.quotes = valid;
                self.selected = self.quotes.first().cloned();
                self.active_request = Some(ticket.request);
                match &self.selected {
                    Some(option) => {
                        self.unavailable = None;
                        QuoteCompletion::Selected(option.clone())
                    }
                    None => {
                        self.unavailable = Some(QuoteUnavailable::NoOptions);
                        QuoteCompletion::Empty
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, courier = %ticket.request.courier_code, "shipping quote failed");
                self.quotes.clear();
                self.selected = None;
                self.active_request = None;
                self.unavailable = Some(QuoteUnavailable::Failed(err));
                QuoteCompletion::Failed
            }
        }
    }

    /// Pick another option from the current list.
    pub fn select_option(
        &mut self,
        code: &str,
        service_name: &str,
    ) -> Result<&ShippingQuoteOption, CheckoutError> {
        let option = self
            .quotes
            .iter()
            .find(|o| o.matches(code, service_name))
            .cloned()
            .ok_or_else(|| CheckoutError::UnknownShippingOption {
                code: code.to_string(),
                service: service_name.to_string(),
            })?;
        Ok(&*self.selected.insert(option))
    }
}
