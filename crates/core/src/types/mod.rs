//! Core types for the Focaccia Plus storefront.

pub mod cart;
pub mod catalog;
pub mod money;
pub mod order;

pub use cart::{Cart, CartLine, OrderSession, OrderType};
pub use catalog::{Category, MenuSection, Product, ProductId};
pub use order::{CustomerDetails, PaymentMethod, compose_whatsapp_message};
