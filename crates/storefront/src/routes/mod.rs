//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Menu page (cache paint + fresh swap)
//! GET  /menu             - Fresh menu fragment (HTMX)
//! GET  /health           - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart             - Cart modal (items + checkout form)
//! POST /cart/add         - Add one unit (returns badge, triggers cart-updated)
//! POST /cart/update      - Adjust quantity by delta (returns modal)
//! POST /cart/remove      - Remove line (returns modal)
//! POST /cart/order-type  - Select pickup/delivery (returns toggle)
//! GET  /cart/count       - Floating cart badge (fragment)
//!
//! # Checkout
//! POST /checkout         - Validate, submit order, hand off to WhatsApp
//!
//! # Newsletter
//! POST /newsletter       - Subscribe (returns success/error fragment)
//! ```

pub mod cart;
pub mod checkout;
pub mod home;
pub mod menu;
pub mod newsletter;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/order-type", post(cart::order_type))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Menu
        .route("/", get(home::home))
        .route("/menu", get(menu::fragment))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::submit))
        // Newsletter
        .route("/newsletter", post(newsletter::subscribe))
}
