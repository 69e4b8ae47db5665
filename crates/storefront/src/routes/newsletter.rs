//! Newsletter subscription route handlers.
//!
//! Inserts subscribers into the backend's `newsletter_subscribers` table.
//! A duplicate email is treated as a successful subscription - they are
//! already on the list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;
use crate::supabase::Subscription;

/// Newsletter subscription form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    pub email: String,
    pub name: Option<String>,
}

/// Success fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_success.html")]
pub struct SubscribeSuccessTemplate {
    pub email: String,
}

/// Error fragment template (replaces the form via HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "newsletter/subscribe_error.html")]
pub struct SubscribeErrorTemplate {
    pub message: String,
    pub email: String,
}

/// Subscribe to the newsletter (HTMX).
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> impl IntoResponse {
    let email = form.email.trim().to_lowercase();
    let name = form.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    if !is_valid_email(&email) {
        return SubscribeErrorTemplate {
            message: "Por favor, indica un correo válido.".to_string(),
            email,
        }
        .into_response();
    }

    match state.supabase().subscribe(&email, name).await {
        Ok(Subscription::Subscribed) => {
            tracing::info!("Newsletter subscription successful");
            SubscribeSuccessTemplate { email }.into_response()
        }
        Ok(Subscription::AlreadySubscribed) => {
            // Already on the list - treat as success
            tracing::info!("Email already subscribed - treating as success");
            SubscribeSuccessTemplate { email }.into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Newsletter subscription failed");
            SubscribeErrorTemplate {
                message: "Algo salió mal. Intenta de nuevo.".to_string(),
                email,
            }
            .into_response()
        }
    }
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    // Simple validation: contains @, has content before and after @
    let mut parts = email.splitn(2, '@');
    let Some(local) = parts.next() else {
        return false;
    };
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && domain.contains('.')
}
