use serde::Serialize;

use crate::catalog::Product;

/// Size preselected for new cart lines.
pub const DEFAULT_SIZE: &str = "M";

/// One cart line. Quantity never drops below 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
    pub selected_color: String,
    pub selected_size: String,
}

impl CartItem {
    fn new(product: &Product) -> Self {
        Self {
            product: *product,
            quantity: 1,
            selected_color: product.colors.first().copied().unwrap_or_default().to_string(),
            selected_size: DEFAULT_SIZE.to_string(),
        }
    }

    pub fn line_total(&self) -> u64 {
        u64::from(self.product.price) * u64::from(self.quantity)
    }
}

/// In-memory cart plus the visibility of its drawer.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
    drawer_open: bool,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`. An existing line is incremented instead of
    /// duplicated. Opens the drawer.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(CartItem::new(product)),
        }
        self.drawer_open = true;
    }

    /// Shift a line's quantity by `delta`, clamped at 1. Unknown ids are
    /// ignored.
    pub fn update_quantity(&mut self, id: &str, delta: i32) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == id) {
            let next = i64::from(item.quantity) + i64::from(delta);
            item.quantity = next.clamp(1, i64::from(u32::MAX)) as u32;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.product.id != id);
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn subtotal(&self) -> u64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn open_drawer(&mut self) {
        self.drawer_open = true;
    }

    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{find, PRODUCTS};

    #[test]
    fn test_add_defaults() {
        let mut cart = CartStore::new();
        cart.add(&PRODUCTS[0]);
        let item = &cart.items()[0];
        assert_eq!(item.quantity, 1);
        assert_eq!(item.selected_color, "Beige");
        assert_eq!(item.selected_size, "M");
        assert!(cart.is_drawer_open());
    }

    #[test]
    fn test_add_twice_merges_line() {
        let mut cart = CartStore::new();
        let coat = find("1").unwrap();
        cart.add(coat);
        cart.add(coat);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_quantity_floor() {
        let mut cart = CartStore::new();
        cart.add(&PRODUCTS[1]);
        cart.update_quantity("2", -1);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity("2", 3);
        assert_eq!(cart.items()[0].quantity, 4);
        cart.update_quantity("2", -10);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut cart = CartStore::new();
        cart.add(&PRODUCTS[2]);
        cart.update_quantity("nope", 5);
        cart.remove("nope");
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_remove_and_subtotal() {
        let mut cart = CartStore::new();
        cart.add(find("1").unwrap()); // 299
        cart.add(find("5").unwrap()); // 85
        cart.update_quantity("5", 1);
        assert_eq!(cart.subtotal(), 299 + 85 * 2);

        cart.remove("1");
        assert_eq!(cart.subtotal(), 170);
        assert_eq!(cart.count(), 2);

        cart.remove("5");
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), 0);
    }

    #[test]
    fn test_drawer_visibility() {
        let mut cart = CartStore::new();
        assert!(!cart.is_drawer_open());
        cart.open_drawer();
        cart.close_drawer();
        assert!(!cart.is_drawer_open());
    }
}
