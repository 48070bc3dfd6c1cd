use serde::Serialize;

/// Department a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Men,
    Women,
    Accessories,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Men => "Men",
            Category::Women => "Women",
            Category::Accessories => "Accessories",
        }
    }
}

/// Category tab selected in the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Tabs in display order.
    pub const TABS: [CategoryFilter; 4] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Men),
        CategoryFilter::Only(Category::Women),
        CategoryFilter::Only(Category::Accessories),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.as_str(),
        }
    }

    /// Parse a tab label such as `"Women"`. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::TABS.into_iter().find(|t| t.label() == label)
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => product.category == *c,
        }
    }
}

/// A catalog entry. Prices are whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub category: Category,
    pub description: &'static str,
    pub image: &'static str,
    pub rating: f32,
    pub reviews: u32,
    pub in_stock: bool,
    pub colors: &'static [&'static str],
}

pub static PRODUCTS: [Product; 6] = [
    Product {
        id: "1",
        name: "Minimalist Wool Overcoat",
        price: 299,
        category: Category::Women,
        description: "A timeless silhouette crafted from premium Italian wool blend. Features a relaxed fit and notched lapels.",
        image: "https://images.unsplash.com/photo-1539533018447-63fcce2678e3?q=80&w=800&auto=format&fit=crop",
        rating: 4.8,
        reviews: 124,
        in_stock: true,
        colors: &["Beige", "Black", "Charcoal"],
    },
    Product {
        id: "2",
        name: "Raw Denim Jacket",
        price: 145,
        category: Category::Men,
        description: "Classic rugged appeal with modern tailoring. 14oz selvedge denim that gets better with every wear.",
        image: "https://images.unsplash.com/photo-1576905341935-4ef2441761b3?q=80&w=800&auto=format&fit=crop",
        rating: 4.6,
        reviews: 89,
        in_stock: true,
        colors: &["Indigo", "Faded Blue"],
    },
    Product {
        id: "3",
        name: "Silk Evening Gown",
        price: 450,
        category: Category::Women,
        description: "Elegant floor-length gown made from 100% mulberry silk. Perfectly drapes for a red-carpet ready look.",
        image: "https://images.unsplash.com/photo-1566174053879-31528523f8ae?q=80&w=800&auto=format&fit=crop",
        rating: 4.9,
        reviews: 56,
        in_stock: true,
        colors: &["Emerald", "Ruby", "Midnight"],
    },
    Product {
        id: "4",
        name: "Leather Chelsea Boots",
        price: 210,
        category: Category::Accessories,
        description: "Handcrafted full-grain leather boots with elastic side panels and durable rubber soles.",
        image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?q=80&w=800&auto=format&fit=crop",
        rating: 4.7,
        reviews: 210,
        in_stock: true,
        colors: &["Tan", "Black"],
    },
    Product {
        id: "5",
        name: "Linen Summer Shirt",
        price: 85,
        category: Category::Men,
        description: "Breathable European linen shirt, garment-dyed for a soft feel. Essential for warm weather.",
        image: "https://images.unsplash.com/photo-1596755094514-f87e34085b2c?q=80&w=800&auto=format&fit=crop",
        rating: 4.5,
        reviews: 142,
        in_stock: true,
        colors: &["White", "Navy", "Olive"],
    },
    Product {
        id: "6",
        name: "Cashmere Ribbed Scarf",
        price: 120,
        category: Category::Accessories,
        description: "Ultra-soft pure cashmere scarf with a modern ribbed texture. Keeps you warm with zero itch.",
        image: "https://images.unsplash.com/photo-1520903920243-00d872a2d1c9?q=80&w=800&auto=format&fit=crop",
        rating: 4.9,
        reviews: 43,
        in_stock: true,
        colors: &["Gray", "Cream", "Camel"],
    },
];

/// Products in the selected tab, in catalog order.
pub fn filter(selected: CategoryFilter) -> Vec<&'static Product> {
    PRODUCTS.iter().filter(|p| selected.matches(p)).collect()
}

pub fn find(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// `$299.00` style price label.
pub fn format_price(amount: u64) -> String {
    format!("${}.00", amount)
}
