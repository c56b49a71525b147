//! Checkout session orchestration.
//!
//! A [`CheckoutSession`] owns all state for one checkout: the last cart read,
//! the address form, region picker lists, shipping resolution, voucher and
//! payment choice, and the submission machine. Collaborators are injected as
//! trait objects.
//!
//! Long-running lookups come in two forms: a one-call `load_*`/`refresh_*`
//! method, and a `begin_*`/`complete_*` pair for hosts that run the remote
//! call themselves. Completions for superseded inputs are discarded.


use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::address::{
    AddressEvent, AddressState, GuestContact, Region, RegionLevel, RegionLists, RegionLookup,
    RegionTicket, ShippingImpact,
};
use crate::cart::{CartLine, CartLineKey, CartStore, CartView};
use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, ServiceError, SubmitError};
use crate::ids::{CourierCode, RegionId, ShopId};
use crate::order::{
    interpret_response, missing_requirements, MissingRequirement, Navigator, Notice,
    OrderOutcome, OrderService, OrderSubmission, PaymentType, SubmissionMachine, SubmissionState,
};
use crate::pricing::{PricingEngine, PricingSnapshot, Voucher};
use crate::shipping::{
    QuoteCompletion, QuoteTicket, ShippingQuoteOption, ShippingQuoteService, ShippingResolver,
};

/// External services a session talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub cart: Arc<dyn CartStore>,
    pub regions: Arc<dyn RegionLookup>,
    pub quotes: Arc<dyn ShippingQuoteService>,
    pub orders: Arc<dyn OrderService>,
    pub navigator: Arc<dyn Navigator>,
}

/// Everything a checkout page renders, computed at once.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSummary {
    pub cart: CartView,
    pub item_count: u64,
    pub pricing: PricingSnapshot,
    pub courier: Option<CourierCode>,
    pub quotes: Vec<ShippingQuoteOption>,
    pub selected_option: Option<ShippingQuoteOption>,
    pub can_choose_courier: bool,
    pub payment_type: PaymentType,
    pub missing: Vec<MissingRequirement>,
    pub state: SubmissionState,
}

/// One guest checkout.
pub struct CheckoutSession {
    config: CheckoutConfig,
    services: Collaborators,
    lines: Vec<CartLine>,
    address: AddressState,
    regions: RegionLists,
    shipping: ShippingResolver,
    voucher: Option<Voucher>,
    payment_type: PaymentType,
    machine: SubmissionMachine,
}

impl CheckoutSession {
    /// Create an empty session. Call [`CheckoutSession::refresh_cart`] before use.
    pub fn new(config: CheckoutConfig, services: Collaborators) -> Self {
        let payment_type = config.default_payment_type;
        Self {
            config,
            services,
            lines: Vec::new(),
            address: AddressState::default(),
            regions: RegionLists::new(),
            shipping: ShippingResolver::new(),
            voucher: None,
            payment_type,
            machine: SubmissionMachine::new(),
        }
    }

    /// Create a session with the cart read and provinces loaded.
    pub async fn open(config: CheckoutConfig, services: Collaborators) -> Result<Self, ServiceError> {
        let mut session = Self::new(config, services);
        session.refresh_cart().await?;
        session.load_regions(RegionLevel::Province).await?;
        Ok(session)
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn address(&self) -> &AddressState {
        &self.address
    }

    pub fn contact(&self) -> &GuestContact {
        &self.address.contact
    }

    pub fn region_lists(&self) -> &RegionLists {
        &self.regions
    }

    pub fn shipping(&self) -> &ShippingResolver {
        &self.shipping
    }

    pub fn voucher(&self) -> Option<&Voucher> {
        self.voucher.as_ref()
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn state(&self) -> SubmissionState {
        self.machine.state()
    }

    pub fn submission(&self) -> &SubmissionMachine {
        &self.machine
    }

    // ---- cart ----

    /// Re-read the cart from the store.
    pub async fn refresh_cart(&mut self) -> Result<(), ServiceError> {
        let origin = self.quote_origin();
        self.lines = self.services.cart.list_lines().await?;
        if self.quote_origin() != origin {
            debug!(origin = ?self.quote_origin(), "quote origin changed");
            self.shipping.invalidate_quotes();
        }
        self.reevaluate();
        Ok(())
    }

    pub async fn increment(&mut self, key: &CartLineKey) -> Result<(), ServiceError> {
        self.services.cart.increment(key).await?;
        self.refresh_cart().await
    }

    pub async fn decrement(&mut self, key: &CartLineKey) -> Result<(), ServiceError> {
        self.services.cart.decrement(key).await?;
        self.refresh_cart().await
    }

    pub async fn remove(&mut self, key: &CartLineKey) -> Result<(), ServiceError> {
        self.services.cart.remove(key).await?;
        self.refresh_cart().await
    }

    pub fn cart_view(&self) -> Result<CartView, CheckoutError> {
        CartView::project(&self.lines, self.config.currency, &self.config.placeholder_image)
    }

    // ---- address ----

    /// Apply one address form event and cascade its effect on shipping.
    pub fn apply(&mut self, event: AddressEvent) -> Result<ShippingImpact, CheckoutError> {
        let level = event.region_level();
        let transition = self.address.apply(event)?;
        self.address = transition.state;

        if let Some(level) = level {
            self.regions.on_selected(level);
        }
        match transition.impact {
            ShippingImpact::None => {}
            ShippingImpact::ResetQuote => self.shipping.invalidate_quotes(),
            ShippingImpact::ResetCourier => self.shipping.reset_courier(),
        }

        self.reevaluate();
        Ok(transition.impact)
    }

    pub fn set_province(&mut self, id: impl Into<RegionId>) -> Result<ShippingImpact, CheckoutError> {
        self.apply(AddressEvent::ProvinceSelected(id.into()))
    }

    pub fn set_city(&mut self, id: impl Into<RegionId>) -> Result<ShippingImpact, CheckoutError> {
        self.apply(AddressEvent::CitySelected(id.into()))
    }

    pub fn set_district(&mut self, id: impl Into<RegionId>) -> Result<ShippingImpact, CheckoutError> {
        self.apply(AddressEvent::DistrictSelected(id.into()))
    }

    /// Start a region lookup. `None` when the parent level is not chosen yet.
    pub fn begin_region_load(&mut self, level: RegionLevel) -> Option<RegionTicket> {
        match level {
            RegionLevel::Province => Some(self.regions.begin_provinces()),
            RegionLevel::City => self.regions.begin_cities(&self.address),
            RegionLevel::District => self.regions.begin_districts(&self.address),
        }
    }

    /// Apply a finished region lookup. `Ok(false)` when it was superseded.
    pub fn complete_region_load(
        &mut self,
        ticket: &RegionTicket,
        result: Result<Vec<Region>, ServiceError>,
    ) -> Result<bool, ServiceError> {
        let regions = result.map_err(|err| {
            warn!(level = %ticket.level, error = %err, "region lookup failed");
            err
        })?;
        let applied = self.regions.complete(ticket, regions);
        if !applied {
            warn!(level = %ticket.level, parent = ?ticket.parent, "discarding stale region list");
        }
        Ok(applied)
    }

    /// Fetch and store one picker list.
    pub async fn load_regions(&mut self, level: RegionLevel) -> Result<bool, ServiceError> {
        let Some(ticket) = self.begin_region_load(level) else {
            return Ok(false);
        };
        let lookup = Arc::clone(&self.services.regions);
        let result = match (ticket.level, ticket.parent.as_ref()) {
            (RegionLevel::City, Some(province)) => lookup.list_cities(province).await,
            (RegionLevel::District, Some(city)) => lookup.list_districts(city).await,
            _ => lookup.list_provinces().await,
        };
        self.complete_region_load(&ticket, result)
    }

    // ---- shipping ----

    /// Shop quotes are priced from.
    pub fn quote_origin(&self) -> Option<ShopId> {
        self.config
            .origin_shop_id
            .clone()
            .or_else(|| self.lines.first().map(|line| line.shop_id.clone()))
    }

    /// Choose a courier from the catalog, or clear the choice.
    pub fn select_courier(&mut self, courier: Option<CourierCode>) -> Result<(), CheckoutError> {
        if let Some(code) = &courier {
            if self.config.courier(code).is_none() {
                return Err(CheckoutError::UnknownCourier(code.to_string()));
            }
        }
        self.shipping.select_courier(courier);
        self.reevaluate();
        Ok(())
    }

    /// Start a quote fetch if one is eligible.
    pub fn begin_quote_fetch(&mut self) -> Option<QuoteTicket> {
        let origin = self.quote_origin();
        let ticket = self
            .shipping
            .begin(&self.address, origin.as_ref(), &self.config.parcel);
        if ticket.is_none() {
            self.reevaluate();
        }
        ticket
    }

    pub fn complete_quote_fetch(
        &mut self,
        ticket: QuoteTicket,
        result: Result<Vec<ShippingQuoteOption>, ServiceError>,
    ) -> QuoteCompletion {
        let completion = self.shipping.complete(ticket, result);
        self.reevaluate();
        completion
    }

    /// Fetch quotes for the current courier and destination. `None` when no
    /// fetch was eligible.
    pub async fn refresh_quotes(&mut self) -> Option<QuoteCompletion> {
        let ticket = self.begin_quote_fetch()?;
        let result = self.services.quotes.quote(&ticket.request).await;
        Some(self.complete_quote_fetch(ticket, result))
    }

    /// Select a courier and fetch its quotes.
    pub async fn choose_courier(
        &mut self,
        courier: CourierCode,
    ) -> Result<Option<QuoteCompletion>, CheckoutError> {
        self.select_courier(Some(courier))?;
        Ok(self.refresh_quotes().await)
    }

    /// Pick another option from the current quote list.
    pub fn select_shipping_option(
        &mut self,
        code: &str,
        service_name: &str,
    ) -> Result<(), CheckoutError> {
        self.shipping.select_option(code, service_name)?;
        self.reevaluate();
        Ok(())
    }

    // ---- pricing & payment ----

    /// Apply or remove a voucher. A voucher that cannot be priced is logged
    /// here and surfaces again from [`Self::pricing`].
    pub fn set_voucher(&mut self, voucher: Option<Voucher>) {
        self.voucher = voucher;
        if let Err(err) = self.pricing() {
            warn!(voucher = ?self.voucher.as_ref().map(|v| &v.code), error = %err, "voucher could not be priced");
        }
        self.reevaluate();
    }

    pub fn set_payment_type(&mut self, payment_type: PaymentType) {
        self.payment_type = payment_type;
        self.reevaluate();
    }

    pub fn pricing(&self) -> Result<PricingSnapshot, CheckoutError> {
        PricingEngine::new(self.config.currency, self.config.discount_policy).price(
            &self.lines,
            self.voucher.as_ref(),
            self.shipping.selected(),
        )
    }

    // ---- readiness & submission ----

    /// Unmet readiness conditions. Empty means ready.
    pub fn missing(&self) -> Result<Vec<MissingRequirement>, CheckoutError> {
        let view = self.cart_view()?;
        Ok(missing_requirements(&view, &self.address.contact, &self.shipping))
    }

    pub fn summary(&self) -> Result<CheckoutSummary, CheckoutError> {
        let cart = self.cart_view()?;
        Ok(CheckoutSummary {
            item_count: cart.item_count(),
            missing: missing_requirements(&cart, &self.address.contact, &self.shipping),
            cart,
            pricing: self.pricing()?,
            courier: self.shipping.courier().cloned(),
            quotes: self.shipping.quotes().to_vec(),
            selected_option: self.shipping.selected().cloned(),
            can_choose_courier: self.address.can_choose_courier(),
            payment_type: self.payment_type,
            state: self.machine.state(),
        })
    }

    /// Place the order.
    ///
    /// On success the cart is cleared, navigation effects are issued and the
    /// outcome is returned. On failure nothing is mutated and the session may
    /// be submitted again.
    #[instrument(skip(self), fields(payment_type = self.payment_type.as_str(), lines = self.lines.len()))]
    pub async fn submit(&mut self) -> Result<OrderOutcome, SubmitError> {
        let missing = self.missing()?;
        self.machine.begin(&missing)?;

        let order = match self.build_submission() {
            Ok(order) => order,
            Err(err) => {
                self.machine.fail(err.clone());
                return Err(err);
            }
        };

        let orders = Arc::clone(&self.services.orders);
        match interpret_response(orders.submit(&order).await) {
            Ok(outcome) => {
                info!(outcome = ?outcome, "order placed");
                self.machine.succeed(outcome.clone());
                self.finish(&outcome).await;
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "order submission failed");
                self.machine.fail(err.clone());
                self.services.navigator.notify(Notice::SubmissionFailed);
                Err(err)
            }
        }
    }

    fn build_submission(&self) -> Result<OrderSubmission, SubmitError> {
        let (Some(request), Some(option)) = (self.shipping.active_request(), self.shipping.selected())
        else {
            return Err(SubmitError::Incomplete(vec![MissingRequirement::ShippingMethod]));
        };

        let pricing = self.pricing()?;
        debug!(grand_total = %pricing.grand_total, "submitting order");

        Ok(OrderSubmission::build(
            &self.address.contact,
            self.payment_type,
            &self.lines,
            request,
            option,
            self.voucher.as_ref(),
        )?)
    }

    async fn finish(&mut self, outcome: &OrderOutcome) {
        if let Err(err) = self.services.cart.clear().await {
            warn!(error = %err, "order placed but cart could not be cleared");
        }
        self.lines.clear();

        for effect in outcome.navigation_effects() {
            self.services.navigator.apply(&effect);
        }
        self.services.navigator.notify(Notice::OrderPlaced);
    }

    fn reevaluate(&mut self) {
        match self.missing() {
            Ok(missing) => {
                let state = self.machine.evaluate(&missing);
                debug!(state = ?state, missing = missing.len(), "readiness evaluated");
            }
            Err(err) => warn!(error = %err, "readiness could not be evaluated"),
        }
    }
}
