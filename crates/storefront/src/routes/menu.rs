//! Menu fragment: the fresh catalog + exchange-rate repaint.
//!
//! The menu is fully re-derived from `(catalog, rate)` on every render -
//! no incremental diffing. Three projection kinds mirror the three visual
//! categories: focaccia cards, condiment bubbles, and simple cards.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use tracing::instrument;

use focaccia_plus_core::{MenuSection, Product, money};

use crate::state::AppState;
use crate::toast::Toast;

/// Fallback image for focaccia cards without one.
const DEFAULT_FOCACCIA_IMAGE: &str =
    "https://images.unsplash.com/photo-1599321955419-7853b2a9746b?auto=format&fit=crop&q=80&w=800";

/// Fallback image for condiment bubbles without one.
const DEFAULT_BUBBLE_IMAGE: &str =
    "https://images.unsplash.com/photo-1519708227418-c8fd9a32b7a2?auto=format&fit=crop&q=80&w=200";

/// Toast shown when the menu cannot be loaded.
const LOAD_ERROR_MESSAGE: &str = "Error al cargar datos. Intenta de nuevo.";

// =============================================================================
// View Models
// =============================================================================

/// Primary item card with image, description, and stock badge.
#[derive(Clone)]
pub struct FocacciaCardView {
    pub id: String,
    pub name: String,
    /// Omitted entirely when the product has no (non-blank) description.
    pub description: Option<String>,
    pub image_url: String,
    pub price_label: String,
    pub out_of_stock: bool,
    /// Staggered entrance delay, e.g. "200ms".
    pub animation_delay: String,
}

/// Condiment/topping bubble (USD price only).
#[derive(Clone)]
pub struct BubbleView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub price_usd: String,
}

/// Simple card for beverages, coffee, and uncategorized products.
#[derive(Clone)]
pub struct SimpleCardView {
    pub id: String,
    pub name: String,
    pub price_label: String,
    pub out_of_stock: bool,
}

/// The whole menu, ready for the template.
#[derive(Clone)]
pub struct MenuView {
    pub rate_label: String,
    pub focaccias: Vec<FocacciaCardView>,
    pub bubbles: Vec<BubbleView>,
    pub others: Vec<SimpleCardView>,
}

impl MenuView {
    /// Project a catalog into the three menu sections at the given rate.
    #[must_use]
    pub fn build(products: &[Product], rate: Decimal) -> Self {
        let mut focaccias = Vec::new();
        let mut bubbles = Vec::new();
        let mut others = Vec::new();

        for product in products {
            match product.category.section() {
                MenuSection::Focaccias => {
                    focaccias.push(focaccia_card(product, rate, focaccias.len()));
                }
                MenuSection::Bubbles => bubbles.push(bubble(product)),
                MenuSection::Other => others.push(simple_card(product, rate)),
            }
        }

        Self {
            rate_label: money::format_rate(rate),
            focaccias,
            bubbles,
            others,
        }
    }
}

fn focaccia_card(product: &Product, rate: Decimal, index: usize) -> FocacciaCardView {
    FocacciaCardView {
        id: product.id.to_string(),
        name: product.name.clone(),
        description: product
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from),
        image_url: product
            .image_url
            .clone()
            .unwrap_or_else(|| DEFAULT_FOCACCIA_IMAGE.to_string()),
        price_label: money::dual_label(product.price, rate),
        out_of_stock: !product.in_stock(),
        animation_delay: format!("{}ms", index * 100),
    }
}

fn bubble(product: &Product) -> BubbleView {
    BubbleView {
        id: product.id.to_string(),
        name: product.name.clone(),
        image_url: product
            .image_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BUBBLE_IMAGE.to_string()),
        price_usd: money::format_usd(product.price),
    }
}

fn simple_card(product: &Product, rate: Decimal) -> SimpleCardView {
    SimpleCardView {
        id: product.id.to_string(),
        name: product.name.clone(),
        price_label: money::dual_label(product.price, rate),
        out_of_stock: !product.in_stock(),
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Menu fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "menu_fragment.html")]
pub struct MenuTemplate {
    pub menu: MenuView,
    /// Whether this render is a cache paint that should swap in `/menu`.
    pub refresh: bool,
    pub toast: Option<Toast>,
}

/// Fetch catalog and exchange rate concurrently and build the fresh menu.
///
/// Both requests must succeed; otherwise the cache-painted catalog (if any)
/// is kept and a single generic error toast is raised.
pub(crate) async fn fresh_menu(state: &AppState) -> (MenuView, Option<Toast>) {
    let (catalog, rate) = tokio::join!(
        state.supabase().fetch_catalog(),
        state.supabase().fetch_exchange_rate()
    );

    match (catalog, rate) {
        (Ok(products), Ok(rate)) => {
            state.catalog_cache().write(&products);
            (MenuView::build(&products, rate), None)
        }
        (catalog, rate) => {
            if let Err(e) = catalog {
                tracing::error!(error = %e, "Failed to fetch catalog");
            }
            if let Err(e) = rate {
                tracing::error!(error = %e, "Failed to fetch exchange rate");
            }
            let painted = state.catalog_cache().read().unwrap_or_default();
            (
                MenuView::build(&painted, Decimal::ONE),
                Some(Toast::error(LOAD_ERROR_MESSAGE)),
            )
        }
    }
}

/// Fresh menu fragment (HTMX swap target of the cache paint).
#[instrument(skip(state))]
pub async fn fragment(State(state): State<AppState>) -> impl IntoResponse {
    let (menu, toast) = fresh_menu(&state).await;
    MenuTemplate {
        menu,
        refresh: false,
        toast,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use focaccia_plus_core::{Category, ProductId};
    use uuid::Uuid;

    fn product(id: u128, category: Category, stock: i32) -> Product {
        Product {
            id: ProductId::new(Uuid::from_u128(id)),
            name: format!("Producto {id}"),
            price: Decimal::new(500, 2),
            category,
            description: None,
            image_url: None,
            icon: None,
            stock,
        }
    }

    #[test]
    fn test_products_partition_into_sections() {
        let catalog = vec![
            product(1, Category::Focaccia, 3),
            product(2, Category::Salsa, 3),
            product(3, Category::Topping, 3),
            product(4, Category::Beverage, 3),
            product(5, Category::Coffee, 3),
            product(6, Category::Other("Postres".to_string()), 3),
        ];
        let menu = MenuView::build(&catalog, Decimal::from(40));

        assert_eq!(menu.focaccias.len(), 1);
        assert_eq!(menu.bubbles.len(), 2);
        assert_eq!(menu.others.len(), 3);
    }

    #[test]
    fn test_out_of_stock_disables_card() {
        let catalog = vec![
            product(1, Category::Focaccia, 0),
            product(2, Category::Focaccia, 2),
            product(3, Category::Beverage, -1),
        ];
        let menu = MenuView::build(&catalog, Decimal::ONE);

        assert!(menu.focaccias[0].out_of_stock);
        assert!(!menu.focaccias[1].out_of_stock);
        assert!(menu.others[0].out_of_stock);
    }

    #[test]
    fn test_out_of_stock_template_disables_add_action() {
        let catalog = vec![product(1, Category::Focaccia, 0)];
        let rendered = MenuTemplate {
            menu: MenuView::build(&catalog, Decimal::ONE),
            refresh: false,
            toast: None,
        }
        .render()
        .expect("menu template renders");

        assert!(rendered.contains("Agotado"));
        assert!(rendered.contains("disabled"));
        assert!(rendered.contains("No disponible"));
    }

    #[test]
    fn test_in_stock_template_enables_add_action() {
        let catalog = vec![product(1, Category::Focaccia, 5)];
        let rendered = MenuTemplate {
            menu: MenuView::build(&catalog, Decimal::ONE),
            refresh: false,
            toast: None,
        }
        .render()
        .expect("menu template renders");

        assert!(!rendered.contains("disabled"));
        assert!(rendered.contains("Agregar al Pedido"));
    }

    #[test]
    fn test_dual_currency_price_label() {
        let menu = MenuView::build(&[product(1, Category::Focaccia, 1)], Decimal::from(40));
        assert_eq!(menu.focaccias[0].price_label, "$5.00 | Bs. 200,00");
        assert_eq!(menu.rate_label, "Bs. 40.00/USD");
    }

    #[test]
    fn test_blank_description_is_dropped() {
        let mut p = product(1, Category::Focaccia, 1);
        p.description = Some("   ".to_string());
        let menu = MenuView::build(&[p], Decimal::ONE);
        assert!(menu.focaccias[0].description.is_none());
    }

    #[test]
    fn test_missing_image_uses_default() {
        let menu = MenuView::build(
            &[
                product(1, Category::Focaccia, 1),
                product(2, Category::Salsa, 1),
            ],
            Decimal::ONE,
        );
        assert_eq!(menu.focaccias[0].image_url, DEFAULT_FOCACCIA_IMAGE);
        assert_eq!(menu.bubbles[0].image_url, DEFAULT_BUBBLE_IMAGE);
    }

    #[test]
    fn test_animation_delay_staggers() {
        let menu = MenuView::build(
            &[
                product(1, Category::Focaccia, 1),
                product(2, Category::Focaccia, 1),
            ],
            Decimal::ONE,
        );
        assert_eq!(menu.focaccias[0].animation_delay, "0ms");
        assert_eq!(menu.focaccias[1].animation_delay, "100ms");
    }
}
