//! Checkout orchestration.
//!
//! The flow: validate local state, submit the order to the atomic backend
//! procedure, then relay the summary over WhatsApp. A stock-depletion
//! rejection aborts everything (the cart is preserved); any other backend
//! failure does NOT - WhatsApp is the authoritative order channel, the
//! backend record is an administrative convenience.

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

use focaccia_plus_core::{
    CustomerDetails, OrderSession, PaymentMethod, compose_whatsapp_message, validate_checkout,
};

use crate::error::Result;
use crate::routes::cart::{load_order, save_order};
use crate::state::AppState;
use crate::supabase::{OrderFailure, OrderOutcome};
use crate::toast::{DURATION_LONG, Toast, ToastTemplate};
use crate::whatsapp;

/// Toast for a stock-depletion abort.
const SOLD_OUT_MESSAGE: &str = "❌ ¡Lo sentimos! Al parecer alguien se llevó el último pan justo \
                                ahora. El pedido se canceló automáticamente.";

/// Toast for a transport-level submission failure.
const SUBMIT_ERROR_MESSAGE: &str = "Hubo un error al procesar el pedido. Intenta de nuevo.";

/// Toast after a fully successful checkout.
const CONFIRMED_MESSAGE: &str =
    "¡Reserva confirmada! En instantes te atenderemos por WhatsApp. 🚀";

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub payment: PaymentMethod,
    pub address: Option<String>,
}

/// Checkout result fragment: the WhatsApp hand-off link plus toasts.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/result.html")]
pub struct CheckoutResultTemplate {
    pub whatsapp_url: String,
    pub toasts: Vec<Toast>,
}

/// Submit the checkout (HTMX).
///
/// The submit button disables itself for the duration of this request
/// (`hx-disabled-elt`), which is the only duplicate-submission guard.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let order = load_order(&session).await;
    let details = CustomerDetails {
        name: form.name.trim().to_string(),
        payment: form.payment,
        address: form.address.unwrap_or_default().trim().to_string(),
    };

    // Local preconditions; the backend is never contacted when they fail.
    if let Err(violation) = validate_checkout(&order.cart, order.order_type, &details) {
        return Ok(ToastTemplate {
            toast: Toast::warning(violation.to_string()),
        }
        .into_response());
    }

    let rate = match state.supabase().fetch_exchange_rate().await {
        Ok(rate) => rate,
        Err(e) => {
            tracing::error!(error = %e, "Checkout aborted: no exchange rate");
            return Ok(error_toast());
        }
    };

    let outcome = match state
        .supabase()
        .submit_order(&order.cart, rate, order.order_type, &details)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Checkout failed in transit");
            return Ok(error_toast());
        }
    };

    if let OrderOutcome::Rejected {
        kind: OrderFailure::InsufficientStock,
        message,
    } = &outcome
    {
        // Authoritative abort: the cart is preserved, no message is
        // composed, and the visitor is told the item sold out.
        tracing::warn!(%message, "Order rejected: insufficient stock");
        return Ok(ToastTemplate {
            toast: Toast::error(SOLD_OUT_MESSAGE).with_duration(DURATION_LONG),
        }
        .into_response());
    }

    relay_and_reset(&state, &session, &order, rate, &details, &outcome).await
}

/// Compose the WhatsApp summary, reset the session, and report the outcome.
async fn relay_and_reset(
    state: &AppState,
    session: &Session,
    order: &OrderSession,
    rate: Decimal,
    details: &CustomerDetails,
    outcome: &OrderOutcome,
) -> Result<Response> {
    let message = compose_whatsapp_message(&order.cart, rate, order.order_type, details);
    let whatsapp_url = whatsapp::order_link(&state.config().whatsapp_number, &message);

    let toasts = match outcome {
        OrderOutcome::Placed { group_id } => {
            tracing::info!(group_id = ?group_id, "Order placed");
            vec![Toast::success(CONFIRMED_MESSAGE)]
        }
        OrderOutcome::Rejected { message, .. } => {
            // Deliberate best-effort policy: relay over WhatsApp anyway.
            tracing::warn!(%message, "Order not persisted, relaying over WhatsApp");
            vec![
                Toast::warning(format!(
                    "⚠️ El pedido se enviará por WhatsApp, pero hubo un detalle técnico \
                     al guardarlo. (Error: {message})"
                )),
                Toast::warning("Pedido procesado (Sin guardado administrativo)"),
            ]
        }
    };

    save_order(session, &OrderSession::default()).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CheckoutResultTemplate {
            whatsapp_url,
            toasts,
        },
    )
        .into_response())
}

fn error_toast() -> Response {
    ToastTemplate {
        toast: Toast::error(SUBMIT_ERROR_MESSAGE),
    }
    .into_response()
}
