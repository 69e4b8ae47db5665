//! Cart state machine and per-visitor order session.
//!
//! The cart is an ordered sequence of lines, at most one per product id.
//! Every mutation keeps the invariant that a stored line has quantity >= 1;
//! a line whose quantity would drop to zero or below is removed instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::catalog::{Product, ProductId};

/// One product plus the requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal in USD (unit price times quantity).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// The shopping cart: an ordered list of lines keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new line with quantity 1 is appended.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity += 1;
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Adjust the quantity of a line by `delta`.
    ///
    /// A resulting quantity of zero or below removes the line. Unknown
    /// product ids are a silent no-op.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) {
        let Some(line) = self.lines.iter_mut().find(|l| l.product.id == id) else {
            return;
        };
        let quantity = i64::from(line.quantity) + delta;
        if quantity <= 0 {
            self.remove(id);
        } else {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove the line for a product id; no-op when absent.
    pub fn remove(&mut self, id: ProductId) {
        self.lines.retain(|l| l.product.id != id);
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Grand total in USD.
    #[must_use]
    pub fn total_usd(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Grand total in VES at the given exchange rate.
    #[must_use]
    pub fn total_ves(&self, rate: Decimal) -> Decimal {
        self.total_usd() * rate
    }
}

/// How the customer receives the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[default]
    Pickup,
    Delivery,
}

impl OrderType {
    /// Wire value, also used in the order RPC metadata.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }

    /// Display label used in the order summary.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pickup => "📍 Pickup",
            Self::Delivery => "🛵 Delivery",
        }
    }

    #[must_use]
    pub const fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery)
    }
}

/// Per-visitor session state: the cart plus the selected order type.
///
/// Stored in the visitor's session and reset to its default (empty cart,
/// pickup) after a successful checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSession {
    pub cart: Cart,
    pub order_type: OrderType,
}
