//! Order metadata and the WhatsApp order summary.
//!
//! WhatsApp is the authoritative order channel for the business; the
//! backend record is an administrative convenience. The summary composed
//! here is what the customer actually sends, so its layout must not drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::cart::{Cart, OrderType};
use crate::types::money;

/// Suggested payment method, offered as a fixed set of labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Efectivo $")]
    CashUsd,
    #[serde(rename = "Pago Móvil Bs")]
    PagoMovil,
    #[serde(rename = "Zelle $")]
    Zelle,
    #[serde(rename = "Efectivo Bs")]
    CashVes,
}

impl PaymentMethod {
    /// The label shown to the customer and relayed with the order.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CashUsd => "Efectivo $",
            Self::PagoMovil => "Pago Móvil Bs",
            Self::Zelle => "Zelle $",
            Self::CashVes => "Efectivo Bs",
        }
    }

    /// All methods, in menu order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::CashUsd, Self::PagoMovil, Self::Zelle, Self::CashVes]
    }
}

/// Customer metadata collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub payment: PaymentMethod,
    pub address: String,
}

/// Compose the human-readable order summary sent over WhatsApp.
///
/// The address line appears only for delivery orders; totals are shown in
/// both currencies together with the exchange rate used.
#[must_use]
pub fn compose_whatsapp_message(
    cart: &Cart,
    rate: Decimal,
    order_type: OrderType,
    details: &CustomerDetails,
) -> String {
    let mut message = String::from("*🍕 Nuevo Pedido Focaccia Plus*\n\n");
    message.push_str(&format!("👤 *Cliente:* {}\n", details.name));
    message.push_str(&format!("💳 *Pago:* {}\n", details.payment.label()));
    message.push_str(&format!("📦 *Tipo:* {}\n", order_type.label()));
    if order_type.is_delivery() {
        message.push_str(&format!("🏠 *Dirección:* {}\n", details.address));
    }
    message.push_str("\n*Detalle del Pedido:*\n");

    for line in cart.lines() {
        message.push_str(&format!(
            "• {}x {} (${})\n",
            line.quantity,
            line.product.name,
            money::format_usd(line.subtotal())
        ));
    }

    message.push_str("\n---");
    message.push_str(&format!(
        "\n*Total USD: ${}*",
        money::format_usd(cart.total_usd())
    ));
    message.push_str(&format!(
        "\n*Total Bs.: {}*",
        money::format_ves(cart.total_ves(rate))
    ));
    message.push_str(&format!("\n\n_Tasa: {}_", money::format_usd(rate)));
    message.push_str("\n\n¿Podrían confirmar disponibilidad para proceder?");

    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::catalog::{Category, Product, ProductId};
    use uuid::Uuid;

    fn product(id: u128, name: &str, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(Uuid::from_u128(id)),
            name: name.to_string(),
            price: Decimal::new(price_cents, 2),
            category: Category::Focaccia,
            description: None,
            image_url: None,
            icon: None,
            stock: 5,
        }
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::default();
        let focaccia = product(1, "Focaccia Clásica", 500);
        cart.add(&focaccia);
        cart.add(&focaccia);
        cart.add(&product(2, "Limonada", 350));
        cart
    }

    #[test]
    fn test_payment_method_wire_values_are_labels() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::PagoMovil).unwrap(),
            "\"Pago Móvil Bs\""
        );
        let parsed: PaymentMethod = serde_json::from_str("\"Zelle $\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Zelle);
    }

    #[test]
    fn test_pickup_message_omits_address() {
        let details = CustomerDetails {
            name: "María".to_string(),
            payment: PaymentMethod::CashUsd,
            address: String::new(),
        };
        let message =
            compose_whatsapp_message(&sample_cart(), Decimal::from(40), OrderType::Pickup, &details);

        assert!(message.starts_with("*🍕 Nuevo Pedido Focaccia Plus*\n\n"));
        assert!(message.contains("👤 *Cliente:* María\n"));
        assert!(message.contains("📦 *Tipo:* 📍 Pickup\n"));
        assert!(!message.contains("Dirección"));
        assert!(message.contains("• 2x Focaccia Clásica ($10.00)\n"));
        assert!(message.contains("• 1x Limonada ($3.50)\n"));
        assert!(message.contains("*Total USD: $13.50*"));
        assert!(message.contains("*Total Bs.: 540,00*"));
        assert!(message.contains("_Tasa: 40.00_"));
        assert!(message.ends_with("¿Podrían confirmar disponibilidad para proceder?"));
    }

    #[test]
    fn test_delivery_message_includes_address() {
        let details = CustomerDetails {
            name: "Pedro".to_string(),
            payment: PaymentMethod::PagoMovil,
            address: "Av. Libertador, Edif. Roca".to_string(),
        };
        let message = compose_whatsapp_message(
            &sample_cart(),
            Decimal::from(40),
            OrderType::Delivery,
            &details,
        );

        assert!(message.contains("📦 *Tipo:* 🛵 Delivery\n"));
        assert!(message.contains("🏠 *Dirección:* Av. Libertador, Edif. Roca\n"));
        assert!(message.contains("💳 *Pago:* Pago Móvil Bs\n"));
    }
}
