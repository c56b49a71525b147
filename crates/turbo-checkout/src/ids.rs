//! Newtype IDs for type-safe identifiers.
//!
//! Keeps a `RegionId` from being passed where a `ShopId` is expected, and a
//! payment reference from being mistaken for an order token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True when the ID is empty or whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(
    /// Opaque grouping key for the seller a line ships from.
    ShopId
);
define_id!(
    /// Province, city or district identifier from the region service.
    RegionId
);
define_id!(VoucherId);
define_id!(
    /// Courier code, e.g. `jne`.
    CourierCode
);
define_id!(
    /// Identifier returned for manually-paid orders.
    OrderToken
);
define_id!(
    /// Reference returned for orders tracked by payment status.
    PaymentReference
);
