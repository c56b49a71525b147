//! Address cascade reducer.
//!
//! Every edit to the guest address goes through [`AddressState::apply`], a
//! pure function from the current state and one event to the next state. The
//! transition also reports what the edit does to shipping, so the caller can
//! drop quotes that belong to the old destination.

use crate::address::{GuestContact, RegionLevel};
use crate::error::CheckoutError;
use crate::ids::RegionId;
use serde::{Deserialize, Serialize};

/// One edit to the guest address form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AddressEvent {
    ProvinceSelected(RegionId),
    CitySelected(RegionId),
    DistrictSelected(RegionId),
    FullNameChanged(String),
    EmailChanged(String),
    PhoneChanged(String),
    AddressLine1Changed(String),
    AddressLine2Changed(Option<String>),
    PostalCodeChanged(String),
}

impl AddressEvent {
    /// The cascade level this event selects, if any.
    pub fn region_level(&self) -> Option<RegionLevel> {
        match self {
            AddressEvent::ProvinceSelected(_) => Some(RegionLevel::Province),
            AddressEvent::CitySelected(_) => Some(RegionLevel::City),
            AddressEvent::DistrictSelected(_) => Some(RegionLevel::District),
            _ => None,
        }
    }
}

/// Where quotes are priced to: the district when chosen, else the postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DestinationKey {
    District(RegionId),
    PostalCode(String),
}

impl DestinationKey {
    pub fn as_str(&self) -> &str {
        match self {
            DestinationKey::District(id) => id.as_str(),
            DestinationKey::PostalCode(code) => code,
        }
    }
}

/// What an address edit does to the shipping selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingImpact {
    /// Nothing shipping-related changed.
    None,
    /// Quotes and the chosen option are stale; the courier stays.
    ResetQuote,
    /// Region changed: courier, quotes and the chosen option are all reset.
    ResetCourier,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTransition {
    pub state: AddressState,
    pub impact: ShippingImpact,
}

/// Address form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressState {
    pub contact: GuestContact,
}

impl AddressState {
    pub fn new(contact: GuestContact) -> Self {
        Self { contact }
    }

    /// Apply one event. Out-of-order region choices are rejected and leave
    /// the state untouched.
    pub fn apply(&self, event: AddressEvent) -> Result<AddressTransition, CheckoutError> {
        let mut contact = self.contact.clone();
        let region_event = event.region_level().is_some();

        match event {
            AddressEvent::ProvinceSelected(id) => contact.region = contact.region.with_province(id),
            AddressEvent::CitySelected(id) => contact.region = contact.region.with_city(id)?,
            AddressEvent::DistrictSelected(id) => {
                contact.region = contact.region.with_district(id)?
            }
            AddressEvent::FullNameChanged(v) => contact.full_name = v,
            AddressEvent::EmailChanged(v) => contact.email = v,
            AddressEvent::PhoneChanged(v) => contact.phone = v,
            AddressEvent::AddressLine1Changed(v) => contact.address_line1 = v,
            AddressEvent::AddressLine2Changed(v) => contact.address_line2 = v,
            AddressEvent::PostalCodeChanged(v) => contact.postal_code = v,
        }

        let state = AddressState { contact };
        let impact = if region_event {
            ShippingImpact::ResetCourier
        } else if state.destination_key() != self.destination_key()
            || state.can_choose_courier() != self.can_choose_courier()
        {
            ShippingImpact::ResetQuote
        } else {
            ShippingImpact::None
        };

        Ok(AddressTransition { state, impact })
    }

    /// Courier choice is allowed once a district is set, or once both the
    /// street address and postal code are filled in.
    pub fn can_choose_courier(&self) -> bool {
        self.contact.region.district_id().is_some()
            || (self.contact.has_address_line1() && self.contact.has_postal_code())
    }

    /// Destination used for quotes.
    pub fn destination_key(&self) -> Option<DestinationKey> {
        match self.contact.region.district_id() {
            Some(district) => Some(DestinationKey::District(district.clone())),
            None if self.contact.has_postal_code() => Some(DestinationKey::PostalCode(
                self.contact.postal_code.trim().to_string(),
            )),
            None => None,
        }
    }

    /// A city lookup may run only once a province is chosen.
    pub fn city_lookup_parent(&self) -> Option<&RegionId> {
        self.contact.region.province_id()
    }

    /// A district lookup may run only once a city is chosen.
    pub fn district_lookup_parent(&self) -> Option<&RegionId> {
        self.contact.region.city_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(s: &str) -> RegionId {
        RegionId::new(s)
    }

    fn apply_all(events: Vec<AddressEvent>) -> AddressState {
        events.into_iter().fold(AddressState::default(), |state, e| {
            state.apply(e).unwrap().state
        })
    }

    fn with_district() -> AddressState {
        apply_all(vec![
            AddressEvent::ProvinceSelected(rid("p1")),
            AddressEvent::CitySelected(rid("c1")),
            AddressEvent::DistrictSelected(rid("d1")),
        ])
    }

    #[test]
    fn test_new_province_clears_city_and_district() {
        let t = with_district()
            .apply(AddressEvent::ProvinceSelected(rid("p2")))
            .unwrap();
        assert!(t.state.contact.region.city_id().is_none());
        assert!(t.state.contact.region.district_id().is_none());
        assert_eq!(t.impact, ShippingImpact::ResetCourier);
    }

    #[test]
    fn test_new_city_clears_district() {
        let t = with_district()
            .apply(AddressEvent::CitySelected(rid("c9")))
            .unwrap();
        assert!(t.state.contact.region.district_id().is_none());
        assert_eq!(t.impact, ShippingImpact::ResetCourier);
    }

    #[test]
    fn test_district_only_sets_district() {
        let t = with_district()
            .apply(AddressEvent::DistrictSelected(rid("d2")))
            .unwrap();
        assert_eq!(t.state.contact.region.city_id(), Some(&rid("c1")));
        assert_eq!(t.state.contact.region.district_id(), Some(&rid("d2")));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let state = AddressState::default();
        assert!(state.apply(AddressEvent::CitySelected(rid("c1"))).is_err());
        assert!(state.apply(AddressEvent::DistrictSelected(rid("d1"))).is_err());
    }

    #[test]
    fn test_can_choose_courier_with_district() {
        assert!(with_district().can_choose_courier());
    }

    #[test]
    fn test_can_choose_courier_with_address_and_postal() {
        let state = apply_all(vec![AddressEvent::AddressLine1Changed("Jl. Merdeka 1".into())]);
        assert!(!state.can_choose_courier());

        let state = state
            .apply(AddressEvent::PostalCodeChanged("10110".into()))
            .unwrap()
            .state;
        assert!(state.can_choose_courier());
    }

    #[test]
    fn test_blank_postal_code_not_eligible() {
        let state = apply_all(vec![
            AddressEvent::AddressLine1Changed("Jl. Merdeka 1".into()),
            AddressEvent::PostalCodeChanged("   ".into()),
        ]);
        assert!(!state.can_choose_courier());
        assert!(state.destination_key().is_none());
    }

    #[test]
    fn test_destination_prefers_district() {
        let state = with_district()
            .apply(AddressEvent::PostalCodeChanged("10110".into()))
            .unwrap();
        assert_eq!(
            state.state.destination_key(),
            Some(DestinationKey::District(rid("d1")))
        );
        // district wins, so the postal edit leaves quotes alone
        assert_eq!(state.impact, ShippingImpact::None);
    }

    #[test]
    fn test_postal_change_without_district_resets_quote() {
        let state = apply_all(vec![
            AddressEvent::AddressLine1Changed("Jl. Merdeka 1".into()),
            AddressEvent::PostalCodeChanged("10110".into()),
        ]);
        let t = state
            .apply(AddressEvent::PostalCodeChanged("10220".into()))
            .unwrap();
        assert_eq!(t.impact, ShippingImpact::ResetQuote);
        assert_eq!(t.state.destination_key().unwrap().as_str(), "10220");
    }

    #[test]
    fn test_contact_fields_have_no_shipping_impact() {
        let t = with_district()
            .apply(AddressEvent::EmailChanged("a@b.c".into()))
            .unwrap();
        assert_eq!(t.impact, ShippingImpact::None);
        assert_eq!(t.state.contact.email, "a@b.c");
    }

    #[test]
    fn test_lookup_parents_follow_selection() {
        let state = AddressState::default();
        assert!(state.city_lookup_parent().is_none());

        let state = state
            .apply(AddressEvent::ProvinceSelected(rid("p1")))
            .unwrap()
            .state;
        assert_eq!(state.city_lookup_parent(), Some(&rid("p1")));
        assert!(state.district_lookup_parent().is_none());
    }
}
