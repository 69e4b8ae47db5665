//! Checkout precondition validation.
//!
//! Validation runs entirely on local state and always reports the first
//! violated rule: the cart must have items, the customer must give a name,
//! and delivery orders must carry an address. Only after all three pass is
//! the backend contacted.

use thiserror::Error;

use crate::types::cart::{Cart, OrderType};
use crate::types::order::CustomerDetails;

/// A violated checkout precondition, with the message shown to the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("El carrito está vacío")]
    EmptyCart,

    #[error("Por favor, indica tu nombre para el pedido.")]
    MissingName,

    #[error("Por favor, indica la dirección de entrega.")]
    MissingAddress,
}

/// Validate the cart and customer details for the selected order type.
///
/// # Errors
///
/// Returns the first violated rule, in order: [`CheckoutError::EmptyCart`],
/// [`CheckoutError::MissingName`], then [`CheckoutError::MissingAddress`]
/// (delivery only).
pub fn validate_checkout(
    cart: &Cart,
    order_type: OrderType,
    details: &CustomerDetails,
) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if details.name.trim().is_empty() {
        return Err(CheckoutError::MissingName);
    }
    if order_type.is_delivery() && details.address.trim().is_empty() {
        return Err(CheckoutError::MissingAddress);
    }
    Ok(())
}
