//! Catalog types: products and their menu categories.
//!
//! A catalog is the active set of sellable products fetched from the
//! backend. Products are immutable once fetched; every successful fetch
//! replaces the catalog wholesale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type-safe product identifier.
///
/// Wraps the backend's UUID primary key so product ids cannot be confused
/// with other identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Create an id from a raw UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ProductId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Menu category of a product.
///
/// The backend stores categories as Spanish display strings; unknown values
/// are preserved in `Other` and rendered in the generic menu section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Focaccia,
    Salsa,
    Topping,
    Beverage,
    Coffee,
    Other(String),
}

impl Category {
    /// The backend's display string for this category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Focaccia => "Focaccias",
            Self::Salsa => "Salsas",
            Self::Topping => "Toppings",
            Self::Beverage => "Bebidas",
            Self::Coffee => "Cafetería",
            Self::Other(raw) => raw,
        }
    }

    /// Which menu section this category renders into.
    #[must_use]
    pub const fn section(&self) -> MenuSection {
        match self {
            Self::Focaccia => MenuSection::Focaccias,
            Self::Salsa | Self::Topping => MenuSection::Bubbles,
            Self::Beverage | Self::Coffee | Self::Other(_) => MenuSection::Other,
        }
    }
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Focaccias" => Self::Focaccia,
            "Salsas" | "Salsas y Toppings" => Self::Salsa,
            "Toppings" => Self::Topping,
            "Bebidas" => Self::Beverage,
            "Cafetería" => Self::Coffee,
            _ => Self::Other(raw),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_owned()
    }
}

/// The three visual sections of the menu page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSection {
    /// Primary item cards with image and description.
    Focaccias,
    /// Condiment/topping bubbles.
    Bubbles,
    /// Simple cards for beverages and everything else.
    Other,
}

/// A sellable product as fetched from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Display name; rows without one fall back to "Sin nombre".
    pub name: String,
    /// Unit price in USD; rows without one fall back to zero.
    pub price: Decimal,
    pub category: Category,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub icon: Option<String>,
    /// Available stock; absent stock is treated as zero.
    pub stock: i32,
}

impl Product {
    /// Whether the product can currently be added to an order.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(stock: i32) -> Product {
        Product {
            id: ProductId::new(Uuid::nil()),
            name: "Focaccia Clásica".to_string(),
            price: Decimal::new(500, 2),
            category: Category::Focaccia,
            description: None,
            image_url: None,
            icon: None,
            stock,
        }
    }

    #[test]
    fn test_category_from_backend_strings() {
        assert_eq!(Category::from("Focaccias".to_string()), Category::Focaccia);
        assert_eq!(Category::from("Salsas".to_string()), Category::Salsa);
        assert_eq!(Category::from("Toppings".to_string()), Category::Topping);
        assert_eq!(Category::from("Bebidas".to_string()), Category::Beverage);
        assert_eq!(Category::from("Cafetería".to_string()), Category::Coffee);
        assert_eq!(
            Category::from("Postres".to_string()),
            Category::Other("Postres".to_string())
        );
    }

    #[test]
    fn test_category_sections() {
        assert_eq!(Category::Focaccia.section(), MenuSection::Focaccias);
        assert_eq!(Category::Salsa.section(), MenuSection::Bubbles);
        assert_eq!(Category::Topping.section(), MenuSection::Bubbles);
        assert_eq!(Category::Beverage.section(), MenuSection::Other);
        assert_eq!(Category::Coffee.section(), MenuSection::Other);
        assert_eq!(
            Category::Other("Postres".to_string()).section(),
            MenuSection::Other
        );
    }

    #[test]
    fn test_category_round_trips_unknown_values() {
        let category = Category::from("Promociones".to_string());
        assert_eq!(String::from(category.clone()), "Promociones");
        assert_eq!(category.as_str(), "Promociones");
    }

    #[test]
    fn test_in_stock() {
        assert!(product(3).in_stock());
        assert!(!product(0).in_stock());
        assert!(!product(-1).in_stock());
    }
}
