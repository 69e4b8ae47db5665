//! Focaccia Plus Core - Shared domain library.
//!
//! This crate provides the domain model used by the storefront binary:
//!
//! - [`types`] - Catalog, cart, money, and order types
//! - [`validate`] - Checkout precondition validation
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Everything that talks to Supabase or renders HTML lives in the
//! `storefront` crate; everything that can be unit-tested without a network
//! lives here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::{CheckoutError, validate_checkout};
