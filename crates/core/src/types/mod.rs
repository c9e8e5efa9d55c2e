//! Core types for Farm2Hand.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{CurrencyCode, MAX_UNIT_PRICE_BAHT, Price, group_thousands};
pub use status::*;
