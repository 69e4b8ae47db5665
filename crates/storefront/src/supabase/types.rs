//! Wire types for the PostgREST endpoints and the order procedure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use focaccia_plus_core::{Cart, CartLine, Category, CustomerDetails, OrderType, Product, ProductId};

/// Backend error code for a stock-depletion rejection.
pub const STOCK_INSUFFICIENT_CODE: &str = "STOCK_INSUFICIENTE";

/// Postgres unique-violation SQLSTATE (duplicate newsletter email).
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

// =============================================================================
// Catalog
// =============================================================================

/// One row of the `sales_prices` view.
#[derive(Debug, Deserialize)]
pub(crate) struct SalesPriceRow {
    pub id: Uuid,
    pub product_name: Option<String>,
    pub precio_venta_final: Option<Decimal>,
    pub categoria: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub icon: Option<String>,
    pub stock_disponible: Option<i32>,
}

impl From<SalesPriceRow> for Product {
    fn from(row: SalesPriceRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row
                .product_name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "Sin nombre".to_string()),
            price: row.precio_venta_final.unwrap_or_default(),
            category: Category::from(row.categoria.unwrap_or_default()),
            description: row.description,
            image_url: row.image_url,
            icon: row.icon,
            stock: row.stock_disponible.unwrap_or(0),
        }
    }
}

// =============================================================================
// Exchange rate
// =============================================================================

/// Single row of the `exchange_rates` table.
#[derive(Debug, Deserialize)]
pub(crate) struct ExchangeRateRow {
    #[allow(dead_code)]
    pub currency_code: String,
    pub rate_to_ves: Decimal,
}

// =============================================================================
// Order procedure
// =============================================================================

/// Payload for the atomic `registrar_pedido_web_v3` procedure.
#[derive(Debug, Serialize)]
pub(crate) struct OrderRpcPayload {
    pub p_items: Vec<OrderRpcItem>,
    pub p_metadata: OrderRpcMetadata,
    #[serde(with = "rust_decimal::serde::float")]
    pub p_rate: Decimal,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderRpcItem {
    pub id: Uuid,
    pub qty: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderRpcMetadata {
    pub client: String,
    pub order_type: &'static str,
    pub address: String,
    pub payment: &'static str,
}

impl OrderRpcPayload {
    pub(crate) fn new(
        cart: &Cart,
        rate: Decimal,
        order_type: OrderType,
        details: &CustomerDetails,
    ) -> Self {
        Self {
            p_items: cart.lines().iter().map(OrderRpcItem::from).collect(),
            p_metadata: OrderRpcMetadata {
                client: details.name.clone(),
                order_type: order_type.as_str(),
                address: details.address.clone(),
                payment: details.payment.label(),
            },
            p_rate: rate,
        }
    }
}

impl From<&CartLine> for OrderRpcItem {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product.id.as_uuid(),
            qty: line.quantity,
            price: line.product.price,
            name: line.product.name.clone(),
        }
    }
}

/// Response body of the order procedure.
///
/// A missing `success` flag is treated as success - the procedure only
/// writes it on a logic rejection.
#[derive(Debug, Deserialize)]
pub(crate) struct OrderRpcResponse {
    pub success: Option<bool>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub order_group: Option<String>,
}

/// Outcome of a checkout submission.
///
/// Business-level rejections are values, not errors; only transport
/// failures surface as [`super::SupabaseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    /// The backend persisted the order.
    Placed { group_id: Option<String> },
    /// The backend refused the order.
    Rejected { kind: OrderFailure, message: String },
}

/// Why the backend refused an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFailure {
    /// The atomic procedure could not reserve stock; checkout must abort.
    InsufficientStock,
    /// Any other backend or logic failure; the order is still relayed
    /// over the messaging channel.
    Other,
}

impl OrderOutcome {
    pub(crate) fn from_rejection(error: Option<String>, message: Option<String>) -> Self {
        let code = error.unwrap_or_default();
        let kind = if code == STOCK_INSUFFICIENT_CODE {
            OrderFailure::InsufficientStock
        } else {
            OrderFailure::Other
        };
        Self::Rejected {
            kind,
            message: message.unwrap_or(code),
        }
    }
}

// =============================================================================
// Newsletter
// =============================================================================

/// Row inserted into `newsletter_subscribers`.
#[derive(Debug, Serialize)]
pub(crate) struct SubscriberInsert {
    pub email: String,
    pub name: Option<String>,
}

/// Result of a newsletter subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Subscribed,
    /// The email was already on the list; treated as success.
    AlreadySubscribed,
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
pub(crate) struct PostgrestErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use focaccia_plus_core::PaymentMethod;

    fn row(name: Option<&str>, category: Option<&str>) -> SalesPriceRow {
        SalesPriceRow {
            id: Uuid::from_u128(7),
            product_name: name.map(String::from),
            precio_venta_final: None,
            categoria: category.map(String::from),
            description: None,
            image_url: None,
            icon: None,
            stock_disponible: None,
        }
    }

    #[test]
    fn test_row_defaults_match_backend_mapping() {
        let product = Product::from(row(None, None));
        assert_eq!(product.name, "Sin nombre");
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.stock, 0);
        assert!(!product.in_stock());
    }

    #[test]
    fn test_row_category_mapping() {
        let product = Product::from(row(Some("Salsa Pesto"), Some("Salsas")));
        assert_eq!(product.category, Category::Salsa);
    }

    #[test]
    fn test_rpc_payload_shape() {
        let mut cart = Cart::default();
        let product = Product::from(SalesPriceRow {
            id: Uuid::from_u128(1),
            product_name: Some("Focaccia Clásica".to_string()),
            precio_venta_final: Some(Decimal::new(500, 2)),
            categoria: Some("Focaccias".to_string()),
            description: None,
            image_url: None,
            icon: None,
            stock_disponible: Some(3),
        });
        cart.add(&product);
        cart.add(&product);

        let details = CustomerDetails {
            name: "María".to_string(),
            payment: PaymentMethod::Zelle,
            address: String::new(),
        };
        let payload =
            OrderRpcPayload::new(&cart, Decimal::from(40), OrderType::Pickup, &details);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["p_rate"], serde_json::json!(40.0));
        assert_eq!(json["p_items"][0]["qty"], serde_json::json!(2));
        assert_eq!(json["p_items"][0]["price"], serde_json::json!(5.0));
        assert_eq!(json["p_metadata"]["client"], "María");
        assert_eq!(json["p_metadata"]["order_type"], "pickup");
        assert_eq!(json["p_metadata"]["payment"], "Zelle $");
    }

    #[test]
    fn test_rejection_classifies_stock_code() {
        let outcome =
            OrderOutcome::from_rejection(Some(STOCK_INSUFFICIENT_CODE.to_string()), None);
        assert_eq!(
            outcome,
            OrderOutcome::Rejected {
                kind: OrderFailure::InsufficientStock,
                message: STOCK_INSUFFICIENT_CODE.to_string(),
            }
        );
    }

    #[test]
    fn test_rejection_other_keeps_message() {
        let outcome = OrderOutcome::from_rejection(
            Some("RLS_DENIED".to_string()),
            Some("permiso denegado".to_string()),
        );
        assert_eq!(
            outcome,
            OrderOutcome::Rejected {
                kind: OrderFailure::Other,
                message: "permiso denegado".to_string(),
            }
        );
    }
}
