//! Submission readiness.

use serde::Serialize;

use crate::address::GuestContact;
use crate::cart::CartView;
use crate::shipping::ShippingResolver;

/// One unmet condition blocking submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRequirement {
    /// At least one line is out of stock.
    OutOfStockItems,
    FullName,
    Email,
    Phone,
    AddressLine1,
    PostalCode,
    /// No courier chosen.
    Courier,
    /// No shipping option resolved for the chosen courier.
    ShippingMethod,
    EmptyCart,
}

impl MissingRequirement {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            MissingRequirement::OutOfStockItems => "out_of_stock_items",
            MissingRequirement::FullName => "full_name",
            MissingRequirement::Email => "email",
            MissingRequirement::Phone => "phone",
            MissingRequirement::AddressLine1 => "address_line1",
            MissingRequirement::PostalCode => "postal_code",
            MissingRequirement::Courier => "courier",
            MissingRequirement::ShippingMethod => "shipping_method",
            MissingRequirement::EmptyCart => "empty_cart",
        }
    }

    /// Message shown to the shopper.
    pub fn message(&self) -> &'static str {
        match self {
            MissingRequirement::OutOfStockItems => {
                "Some items in your cart are out of stock. Remove them to continue."
            }
            MissingRequirement::FullName => "Please enter your full name.",
            MissingRequirement::Email => "Please enter your email address.",
            MissingRequirement::Phone => "Please enter your phone number.",
            MissingRequirement::AddressLine1 => "Please enter your street address.",
            MissingRequirement::PostalCode => "Please enter your postal code.",
            MissingRequirement::Courier => "Please choose a courier.",
            MissingRequirement::ShippingMethod => {
                "No shipping option is available yet for this address and courier."
            }
            MissingRequirement::EmptyCart => "Your cart is empty.",
        }
    }
}

/// Every unmet readiness condition, in a stable order. Empty means ready.
pub fn missing_requirements(
    cart: &CartView,
    contact: &GuestContact,
    shipping: &ShippingResolver,
) -> Vec<MissingRequirement> {
    let mut missing = Vec::new();

    if cart.has_out_of_stock_items {
        missing.push(MissingRequirement::OutOfStockItems);
    }

    let fields = [
        (contact.has_full_name(), MissingRequirement::FullName),
        (contact.has_email(), MissingRequirement::Email),
        (contact.has_phone(), MissingRequirement::Phone),
        (contact.has_address_line1(), MissingRequirement::AddressLine1),
        (contact.has_postal_code(), MissingRequirement::PostalCode),
    ];
    missing.extend(fields.iter().filter(|(ok, _)| !ok).map(|(_, m)| *m));

    if shipping.courier().is_none() {
        missing.push(MissingRequirement::Courier);
    } else if shipping.selected().is_none() {
        missing.push(MissingRequirement::ShippingMethod);
    }

    if cart.is_empty() {
        missing.push(MissingRequirement::EmptyCart);
    }

    missing
}
