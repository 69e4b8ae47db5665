//! Home page route handler.
//!
//! On load the page paints the cached catalog immediately when a fresh
//! snapshot exists (an HTMX load trigger then swaps in the live menu);
//! without a snapshot the live fetch happens inline.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use focaccia_plus_core::money;

use crate::filters;
use crate::routes::cart::load_order;
use crate::routes::menu::{self, MenuView};
use crate::state::AppState;
use crate::toast::Toast;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub menu: MenuView,
    /// True when the menu was painted from the cache and should be
    /// superseded by `GET /menu`.
    pub refresh: bool,
    pub toast: Option<Toast>,
    /// Floating cart badge state.
    pub count: u32,
    pub total_usd: String,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let order = load_order(&session).await;

    // Best-effort early paint from the snapshot; the fresh fetch follows
    // via the HTMX load trigger and supersedes it unconditionally.
    let (menu_view, refresh, toast) = match state.catalog_cache().read() {
        Some(products) => (MenuView::build(&products, Decimal::ONE), true, None),
        None => {
            let (menu_view, toast) = menu::fresh_menu(&state).await;
            (menu_view, false, toast)
        }
    };

    HomeTemplate {
        menu: menu_view,
        refresh,
        toast,
        count: order.cart.item_count(),
        total_usd: money::format_usd(order.cart.total_usd()),
    }
}
