//! Cart store collaborator.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cart::{CartLine, CartLineKey};
use crate::error::ServiceError;

/// External owner of the cart lines.
///
/// The checkout reads lines through this trait and delegates every mutation
/// to it; it never keeps its own copy of the cart beyond the last read.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Current cart lines.
    async fn list_lines(&self) -> Result<Vec<CartLine>, ServiceError>;

    /// Increase a line's quantity by one.
    async fn increment(&self, key: &CartLineKey) -> Result<(), ServiceError>;

    /// Decrease a line's quantity by one.
    async fn decrement(&self, key: &CartLineKey) -> Result<(), ServiceError>;

    /// Remove a line.
    async fn remove(&self, key: &CartLineKey) -> Result<(), ServiceError>;

    /// Remove every line.
    async fn clear(&self) -> Result<(), ServiceError>;
}

/// Cart store kept in process memory.
///
/// Decrementing a line at quantity 1 removes it.
#[derive(Default)]
pub struct InMemoryCartStore {
    lines: RwLock<Vec<CartLine>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with lines.
    pub fn with_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines: RwLock::new(lines),
        }
    }

    /// Add a line, merging quantities with an existing line of the same key.
    pub async fn add(&self, line: CartLine) {
        let mut lines = self.lines.write().await;
        let key = line.key();
        if let Some(existing) = lines.iter_mut().find(|l| l.key() == key) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            lines.push(line);
        }
    }
}

fn not_found(key: &CartLineKey) -> ServiceError {
    ServiceError::Http {
        status: 404,
        message: format!("Item not in cart: {}", key.product_id),
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn list_lines(&self) -> Result<Vec<CartLine>, ServiceError> {
        Ok(self.lines.read().await.clone())
    }

    async fn increment(&self, key: &CartLineKey) -> Result<(), ServiceError> {
        let mut lines = self.lines.write().await;
        let line = lines
            .iter_mut()
            .find(|l| &l.key() == key)
            .ok_or_else(|| not_found(key))?;
        line.quantity = line.quantity.saturating_add(1);
        Ok(())
    }

    async fn decrement(&self, key: &CartLineKey) -> Result<(), ServiceError> {
        let mut lines = self.lines.write().await;
        let index = lines
            .iter()
            .position(|l| &l.key() == key)
            .ok_or_else(|| not_found(key))?;
        if lines[index].quantity <= 1 {
            lines.remove(index);
        } else {
            lines[index].quantity -= 1;
        }
        Ok(())
    }

    async fn remove(&self, key: &CartLineKey) -> Result<(), ServiceError> {
        let mut lines = self.lines.write().await;
        let before = lines.len();
        lines.retain(|l| &l.key() != key);
        if lines.len() == before {
            return Err(not_found(key));
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), ServiceError> {
        self.lines.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryCartStore {
        InMemoryCartStore::with_lines(vec![
            CartLine::new("p1", "shop-1", "Kopi", 50000, 2),
            CartLine::new("p2", "shop-1", "Teh", 20000, 1),
        ])
    }

    #[tokio::test]
    async fn test_increment_and_decrement() {
        let store = store();
        let key = CartLineKey::new("p1", None);

        store.increment(&key).await.unwrap();
        assert_eq!(store.list_lines().await.unwrap()[0].quantity, 3);

        store.decrement(&key).await.unwrap();
        assert_eq!(store.list_lines().await.unwrap()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_decrement_last_unit_removes_line() {
        let store = store();
        store.decrement(&CartLineKey::new("p2", None)).await.unwrap();
        let lines = store.list_lines().await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id.as_str(), "p1");
    }

    #[tokio::test]
    async fn test_remove_unknown_line() {
        let store = store();
        let err = store.remove(&CartLineKey::new("nope", None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_add_merges_same_key() {
        let store = store();
        store.add(CartLine::new("p1", "shop-1", "Kopi", 50000, 3)).await;
        let lines = store.list_lines().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = store();
        store.clear().await.unwrap();
        assert!(store.list_lines().await.unwrap().is_empty());
    }
}
