//! Cart
//!
//! The cart aggregate: an ordered list of [`CartLine`]s owned by whoever
//! drives the storefront, persisted as a whole after every mutation.

use std::{fmt, sync::Arc};

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    pricing::total_price,
    storage::{MemoryStorage, Storage, load_json, save_json},
};

mod line;
pub mod receipt;

pub use line::CartLine;

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "online-order-cart-v1";

/// Cart
pub struct Cart {
    lines: Vec<CartLine>,
    storage: Arc<dyn Storage>,
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Load the cart from storage. A missing or unreadable cart loads empty.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let mut lines: Vec<CartLine> = load_json(storage.as_ref(), CART_STORAGE_KEY)
            .unwrap_or_default();
        lines.retain(|line| line.quantity > 0);

        debug!(lines = lines.len(), "cart loaded");

        Self { lines, storage }
    }

    /// An empty cart that lives only in memory.
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    /// Add a line, merging it into an existing line with the same
    /// configuration. A zero quantity counts as one.
    pub fn add(&mut self, mut line: CartLine) {
        line.quantity = line.quantity.max(1);

        match self.lines.iter_mut().find(|existing| existing.is_same_line(&line)) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => self.lines.push(line),
        }

        self.persist();
    }

    /// Remove the line at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
            self.persist();
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// An independent snapshot of the lines.
    pub fn items(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Iterate over the lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Get a line by position.
    pub fn get(&self, index: usize) -> Option<&CartLine> {
        self.lines.get(index)
    }

    /// Order total: each line's unit price times its quantity, summed.
    pub fn total(&self) -> Decimal {
        total_price(&self.lines)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn persist(&self) {
        save_json(self.storage.as_ref(), CART_STORAGE_KEY, &self.lines);
    }
}
