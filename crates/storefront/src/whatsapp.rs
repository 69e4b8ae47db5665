//! WhatsApp deep-link construction.
//!
//! Orders are relayed to the business as a pre-formatted message through a
//! `wa.me` link opened in a new browser context. Nothing is read back -
//! fire and forget.

/// Build the `wa.me` deep link carrying an order summary.
#[must_use]
pub fn order_link(number: &str, message: &str) -> String {
    format!("https://wa.me/{number}?text={}", urlencoding::encode(message))
}
