//! Guest address module.
//!
//! Contains the guest contact form, the province → city → district cascade
//! and the region lists that feed its pickers.

mod cascade;
mod contact;
mod region;

pub use cascade::{AddressEvent, AddressState, AddressTransition, DestinationKey, ShippingImpact};
pub use contact::{GuestContact, RegionLevel, RegionSelection};
pub use region::{Region, RegionLists, RegionLookup, RegionTicket};
