//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the visitor's session as an [`OrderSession`];
//! every mutation loads it, applies the change, saves it back, and returns
//! a re-rendered fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use focaccia_plus_core::{Cart, OrderSession, OrderType, PaymentMethod, ProductId, money};

use crate::error::Result;
use crate::state::AppState;
use crate::toast::{DURATION_SHORT, Toast};

/// Session key holding the [`OrderSession`].
pub const ORDER_SESSION_KEY: &str = "order";

// =============================================================================
// View Models
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartSummaryView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub total_usd: String,
    pub total_ves: String,
}

impl CartSummaryView {
    /// Derive the display cart from the session cart at the given rate.
    #[must_use]
    pub fn build(cart: &Cart, rate: Decimal) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartItemView {
                    id: line.product.id.to_string(),
                    name: line.product.name.clone(),
                    unit_price: money::format_usd(line.product.price),
                    quantity: line.quantity,
                    subtotal: money::format_usd(line.subtotal()),
                })
                .collect(),
            item_count: cart.item_count(),
            total_usd: money::format_usd(cart.total_usd()),
            total_ves: money::format_ves(cart.total_ves(rate)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the order session, defaulting to an empty pickup order.
pub async fn load_order(session: &Session) -> OrderSession {
    session
        .get::<OrderSession>(ORDER_SESSION_KEY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the order session.
///
/// # Errors
///
/// Returns the session-store error, surfaced as a 500 by `AppError`.
pub async fn save_order(
    session: &Session,
    order: &OrderSession,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(ORDER_SESSION_KEY, order).await
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: Uuid,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: Uuid,
    pub delta: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: Uuid,
}

/// Order type toggle form data.
#[derive(Debug, Deserialize)]
pub struct OrderTypeForm {
    pub order_type: OrderType,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart modal template (items, quantity controls, checkout form).
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartModalTemplate {
    pub cart: CartSummaryView,
    pub order_type: OrderType,
    pub payments: Vec<&'static str>,
}

impl CartModalTemplate {
    fn new(cart: CartSummaryView, order_type: OrderType) -> Self {
        Self {
            cart,
            order_type,
            payments: PaymentMethod::all().iter().map(PaymentMethod::label).collect(),
        }
    }
}

/// Floating cart badge fragment (count + USD total), with an optional
/// out-of-band toast.
#[derive(Template, WebTemplate)]
#[template(path = "cart/count.html")]
pub struct CartCountTemplate {
    pub count: u32,
    pub total_usd: String,
    pub toast: Option<Toast>,
}

/// Order type toggle fragment (buttons + address field for delivery).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_type.html")]
pub struct OrderTypeTemplate {
    pub order_type: OrderType,
}

// =============================================================================
// Handlers
// =============================================================================

/// Resolve the display rate, degrading to 1 when unavailable.
async fn display_rate(state: &AppState) -> Decimal {
    match state.supabase().fetch_exchange_rate().await {
        Ok(rate) => rate,
        Err(e) => {
            tracing::warn!(error = %e, "Rate unavailable for cart render");
            Decimal::ONE
        }
    }
}

/// Display the cart modal (HTMX).
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let order = load_order(&session).await;
    let rate = display_rate(&state).await;
    CartModalTemplate::new(CartSummaryView::build(&order.cart, rate), order.order_type)
}

/// Add one unit of a product to the cart (HTMX).
///
/// Unknown product ids are a silent guard: the badge is returned unchanged
/// and no toast is raised.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let catalog = state.catalog().await?;
    let mut order = load_order(&session).await;

    let toast = match catalog
        .iter()
        .find(|p| p.id == ProductId::new(form.product_id))
    {
        Some(product) => {
            order.cart.add(product);
            save_order(&session, &order).await?;
            Some(Toast::success(format!("Agregado: {}", product.name)).with_duration(DURATION_SHORT))
        }
        None => None,
    };

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: order.cart.item_count(),
            total_usd: money::format_usd(order.cart.total_usd()),
            toast,
        },
    )
        .into_response())
}

/// Adjust a line's quantity by a delta (HTMX).
///
/// A resulting quantity of zero or below removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut order = load_order(&session).await;
    order
        .cart
        .change_quantity(ProductId::new(form.product_id), form.delta);
    save_order(&session, &order).await?;

    let rate = display_rate(&state).await;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartModalTemplate::new(CartSummaryView::build(&order.cart, rate), order.order_type),
    )
        .into_response())
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut order = load_order(&session).await;
    order.cart.remove(ProductId::new(form.product_id));
    save_order(&session, &order).await?;

    let rate = display_rate(&state).await;
    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartModalTemplate::new(CartSummaryView::build(&order.cart, rate), order.order_type),
    )
        .into_response())
}

/// Select pickup or delivery (HTMX).
///
/// Pure state update; validation of the delivery address happens at
/// checkout.
#[instrument(skip(session))]
pub async fn order_type(
    session: Session,
    Form(form): Form<OrderTypeForm>,
) -> Result<Response> {
    let mut order = load_order(&session).await;
    order.order_type = form.order_type;
    save_order(&session, &order).await?;

    Ok(OrderTypeTemplate {
        order_type: form.order_type,
    }
    .into_response())
}

/// Floating cart badge (HTMX refresh on `cart-updated`).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let order = load_order(&session).await;
    CartCountTemplate {
        count: order.cart.item_count(),
        total_usd: money::format_usd(order.cart.total_usd()),
        toast: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use focaccia_plus_core::{Category, Product};

    fn product(id: u128, price_cents: i64) -> Product {
        Product {
            id: ProductId::new(Uuid::from_u128(id)),
            name: format!("Producto {id}"),
            price: Decimal::new(price_cents, 2),
            category: Category::Focaccia,
            description: None,
            image_url: None,
            icon: None,
            stock: 9,
        }
    }

    #[test]
    fn test_cart_summary_totals_in_both_currencies() {
        let mut cart = Cart::default();
        let a = product(1, 500);
        cart.add(&a);
        cart.add(&a);
        cart.add(&product(2, 350));

        let view = CartSummaryView::build(&cart, Decimal::from(40));
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total_usd, "13.50");
        assert_eq!(view.total_ves, "540,00");
        assert_eq!(view.items[0].subtotal, "10.00");
    }

    #[test]
    fn test_empty_cart_summary() {
        let view = CartSummaryView::build(&Cart::default(), Decimal::ONE);
        assert!(view.is_empty());
        assert_eq!(view.total_usd, "0.00");
        assert_eq!(view.total_ves, "0,00");
    }

    #[test]
    fn test_modal_template_renders_checkout_form_only_with_items() {
        let mut cart = Cart::default();
        cart.add(&product(1, 500));

        let with_items = CartModalTemplate::new(
            CartSummaryView::build(&cart, Decimal::from(40)),
            OrderType::Pickup,
        )
        .render()
        .expect("modal renders");
        assert!(with_items.contains("checkout-form"));
        assert!(with_items.contains("Efectivo $"));

        let empty = CartModalTemplate::new(
            CartSummaryView::build(&Cart::default(), Decimal::ONE),
            OrderType::Pickup,
        )
        .render()
        .expect("modal renders");
        assert!(!empty.contains("checkout-form"));
        assert!(empty.contains("Aún no has elegido ninguna delicia."));
    }

    #[test]
    fn test_count_template_hides_badge_when_empty() {
        let rendered = CartCountTemplate {
            count: 0,
            total_usd: "0.00".to_string(),
            toast: None,
        }
        .render()
        .expect("count renders");
        assert!(rendered.contains("empty"));

        let rendered = CartCountTemplate {
            count: 3,
            total_usd: "13.50".to_string(),
            toast: None,
        }
        .render()
        .expect("count renders");
        assert!(rendered.contains("$13.50"));
    }

    #[test]
    fn test_order_type_template_toggles_address_field() {
        let delivery = OrderTypeTemplate {
            order_type: OrderType::Delivery,
        }
        .render()
        .expect("toggle renders");
        assert!(delivery.contains("delivery-address-container"));

        let pickup = OrderTypeTemplate {
            order_type: OrderType::Pickup,
        }
        .render()
        .expect("toggle renders");
        assert!(!pickup.contains("delivery-address-container"));
    }
}
