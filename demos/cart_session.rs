//! Browse a category and fill the cart. No network access needed.
//!
//! ```sh
//! cargo run --example cart_session
//! ```

use storefront_studio::catalog::{self, format_price};
use storefront_studio::{CartStore, Category, CategoryFilter};

fn main() {
    for tab in CategoryFilter::TABS {
        println!("{}: {} products", tab.label(), catalog::filter(tab).len());
    }

    let mut cart = CartStore::new();
    for product in catalog::filter(CategoryFilter::Only(Category::Accessories)) {
        cart.add(product);
    }
    if let Some(scarf) = catalog::find("6") {
        cart.add(scarf);
    }
    cart.update_quantity("4", -1);

    println!("\nCart ({} items):", cart.count());
    for item in cart.items() {
        println!(
            "  {} x{} [{}, {}] {}",
            item.product.name,
            item.quantity,
            item.selected_color,
            item.selected_size,
            format_price(item.line_total())
        );
    }
    println!("Subtotal: {}", format_price(cart.subtotal()));
}
