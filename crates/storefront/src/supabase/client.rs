//! PostgREST client implementation.

use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use focaccia_plus_core::{Cart, CustomerDetails, OrderType, Product};

use crate::config::{ConfigError, SupabaseConfig};
use crate::supabase::SupabaseError;
use crate::supabase::types::{
    ExchangeRateRow, OrderOutcome, OrderRpcPayload, OrderRpcResponse, PostgrestErrorBody,
    SalesPriceRow, SubscriberInsert, Subscription, UNIQUE_VIOLATION_CODE,
};

/// The single foreign currency the shop prices in.
const CURRENCY_CODE: &str = "USD";

/// How long a fetched exchange rate is reused before re-querying.
const RATE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Client for the Supabase PostgREST API.
///
/// Holds no session state; every method is a self-contained remote call.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: String,
    rate_cache: Cache<&'static str, Decimal>,
}

impl SupabaseClient {
    /// Create a new client with the anon key installed as default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the anon key cannot be used as a header value or
    /// the HTTP client fails to build.
    pub fn new(config: &SupabaseConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();

        let key_value = HeaderValue::from_str(config.anon_key()).map_err(|e| {
            ConfigError::InvalidEnvVar("SUPABASE_ANON_KEY".to_string(), e.to_string())
        })?;
        headers.insert("apikey", key_value);

        let bearer = format!("Bearer {}", config.anon_key());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&bearer).map_err(|e| {
                ConfigError::InvalidEnvVar("SUPABASE_ANON_KEY".to_string(), e.to_string())
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string())
            })?;

        let rate_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(RATE_CACHE_TTL)
            .build();

        Ok(Self {
            client,
            rest_url: config.rest_url(),
            rate_cache,
        })
    }

    /// Fetch the active catalog, ordered by category name ascending.
    ///
    /// # Errors
    ///
    /// [`SupabaseError::CatalogUnavailable`] when the backend has no active
    /// rows, [`SupabaseError::NetworkUnavailable`] on connectivity loss,
    /// [`SupabaseError::Backend`] for anything else.
    #[instrument(skip(self))]
    pub async fn fetch_catalog(&self) -> Result<Vec<Product>, SupabaseError> {
        let url = format!("{}/sales_prices", self.rest_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("select", "*"),
                ("esta_activo", "eq.true"),
                ("order", "categoria.asc"),
            ])
            .send()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        if !status.is_success() {
            return Err(SupabaseError::Backend(postgrest_message(status, &body)));
        }

        let rows: Vec<SalesPriceRow> = serde_json::from_str(&body)
            .map_err(|e| SupabaseError::Backend(format!("respuesta inválida: {e}")))?;

        if rows.is_empty() {
            return Err(SupabaseError::CatalogUnavailable);
        }

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetch the VES-per-USD exchange rate.
    ///
    /// Degrades to a rate of 1 on any failure except explicit connectivity
    /// loss - the menu must never block on this value. Successful rates are
    /// memoized for [`RATE_CACHE_TTL`]; failures never are.
    ///
    /// # Errors
    ///
    /// Only [`SupabaseError::NetworkUnavailable`].
    #[instrument(skip(self))]
    pub async fn fetch_exchange_rate(&self) -> Result<Decimal, SupabaseError> {
        if let Some(rate) = self.rate_cache.get(CURRENCY_CODE).await {
            return Ok(rate);
        }

        match self.query_exchange_rate().await {
            Ok(rate) => {
                self.rate_cache.insert(CURRENCY_CODE, rate).await;
                Ok(rate)
            }
            Err(SupabaseError::NetworkUnavailable) => Err(SupabaseError::NetworkUnavailable),
            Err(e) => {
                warn!(error = %e, "Exchange rate unavailable, using default rate 1");
                Ok(Decimal::ONE)
            }
        }
    }

    async fn query_exchange_rate(&self) -> Result<Decimal, SupabaseError> {
        let url = format!("{}/exchange_rates", self.rest_url);
        let filter = format!("eq.{CURRENCY_CODE}");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("select", "currency_code,rate_to_ves"),
                ("currency_code", filter.as_str()),
            ])
            // Single-row request; PostgREST errors when row count != 1
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        if !status.is_success() {
            return Err(SupabaseError::Backend(postgrest_message(status, &body)));
        }

        let row: ExchangeRateRow = serde_json::from_str(&body)
            .map_err(|e| SupabaseError::Backend(format!("respuesta inválida: {e}")))?;

        if row.rate_to_ves <= Decimal::ZERO {
            return Err(SupabaseError::Backend(format!(
                "tasa no positiva: {}",
                row.rate_to_ves
            )));
        }

        Ok(row.rate_to_ves)
    }

    /// Submit an order through the atomic backend procedure.
    ///
    /// Business-level rejections (insufficient stock, logic errors) are
    /// returned as [`OrderOutcome::Rejected`], never as `Err`.
    ///
    /// # Errors
    ///
    /// Only transport-level failures.
    #[instrument(skip(self, cart, details), fields(items = cart.lines().len()))]
    pub async fn submit_order(
        &self,
        cart: &Cart,
        rate: Decimal,
        order_type: OrderType,
        details: &CustomerDetails,
    ) -> Result<OrderOutcome, SupabaseError> {
        let url = format!("{}/rpc/registrar_pedido_web_v3", self.rest_url);
        let payload = OrderRpcPayload::new(cart, rate, order_type, details);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        // The backend answered; from here on everything is a reported
        // outcome, not an error.
        if !status.is_success() {
            let message = postgrest_message(status, &body);
            warn!(%status, %message, "Order procedure returned an error");
            return Ok(OrderOutcome::from_rejection(Some(message), None));
        }

        let parsed: OrderRpcResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "Order procedure returned an unreadable body");
                return Ok(OrderOutcome::from_rejection(
                    Some(format!("respuesta inválida: {e}")),
                    None,
                ));
            }
        };

        if parsed.success == Some(false) {
            warn!(error = ?parsed.error, "Order procedure rejected the order");
            return Ok(OrderOutcome::from_rejection(parsed.error, parsed.message));
        }

        Ok(OrderOutcome::Placed {
            group_id: parsed.order_group,
        })
    }

    /// Insert a newsletter subscriber.
    ///
    /// A duplicate email is an idempotent success
    /// ([`Subscription::AlreadySubscribed`]).
    ///
    /// # Errors
    ///
    /// Connectivity loss or any backend failure other than the uniqueness
    /// violation.
    #[instrument(skip(self, name), fields(email = %email))]
    pub async fn subscribe(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<Subscription, SupabaseError> {
        let url = format!("{}/newsletter_subscribers", self.rest_url);
        let insert = SubscriberInsert {
            email: email.to_string(),
            name: name.map(String::from),
        };

        let response = self
            .client
            .post(&url)
            .header("Prefer", "return=minimal")
            .json(&[insert])
            .send()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(Subscription::Subscribed);
        }

        let body = response
            .text()
            .await
            .map_err(|e| SupabaseError::from_transport(&e))?;

        if is_unique_violation(status, &body) {
            return Ok(Subscription::AlreadySubscribed);
        }

        Err(SupabaseError::Backend(postgrest_message(status, &body)))
    }
}

/// Extract the backend's message from a PostgREST error body.
fn postgrest_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<PostgrestErrorBody>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

/// Whether an error response is the duplicate-email uniqueness violation.
fn is_unique_violation(status: StatusCode, body: &str) -> bool {
    if status != StatusCode::CONFLICT {
        return false;
    }
    serde_json::from_str::<PostgrestErrorBody>(body)
        .ok()
        .and_then(|e| e.code)
        .is_some_and(|code| code == UNIQUE_VIOLATION_CODE)
}
