//! Supabase PostgREST client.
//!
//! # Architecture
//!
//! - Supabase is the source of truth - inventory, pricing, orders, and
//!   newsletter subscribers all live there; this crate never persists them.
//! - Plain PostgREST over `reqwest`; the anon key travels as `apikey` and
//!   bearer token on every request.
//! - The atomic order procedure (`registrar_pedido_web_v3`) validates stock
//!   and persists the order as one unit; this client only reports its
//!   outcome.
//! - Successful exchange rates are memoized in-memory via `moka` for a
//!   short TTL so fragment renders do not re-query the backend.

mod client;
pub mod types;

pub use client::SupabaseClient;
pub use types::{OrderFailure, OrderOutcome, Subscription};

use thiserror::Error;

/// Errors that can occur when talking to Supabase.
///
/// Business-level order rejections are NOT errors - they are reported as
/// [`OrderOutcome::Rejected`]. This enum covers connectivity loss, an empty
/// catalog, and everything else the backend can fail with.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// No connectivity to the backend.
    #[error("Sin conexión a internet. Verifica tu red.")]
    NetworkUnavailable,

    /// The backend reports no active products.
    #[error("No hay productos disponibles en este momento")]
    CatalogUnavailable,

    /// Any other remote failure, carrying the backend's message.
    #[error("Error del servicio: {0}")]
    Backend(String),
}

impl SupabaseError {
    /// Classify a transport-level `reqwest` failure.
    ///
    /// Connection failures and timeouts mean the network is gone; anything
    /// else is reported with its message.
    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::NetworkUnavailable
        } else {
            Self::Backend(error.to_string())
        }
    }
}
