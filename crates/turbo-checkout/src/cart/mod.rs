//! Cart module.
//!
//! Cart lines are owned by an external store; this module reads them,
//! delegates mutations, and projects them into a display view.

mod line;
mod projector;
mod store;

pub use line::{CartLine, CartLineKey, MediaAsset};
pub use projector::{CartLineView, CartView, ShopGroup};
pub use store::{CartStore, InMemoryCartStore};
