//! Farm2Hand Core - Domain types for the seller dashboard.
//!
//! This crate provides the types shared by the dashboard server and the CLI:
//! - `dashboard` - Server-rendered seller dashboard
//! - `cli` - Seed data export and validation
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no storage. Every state change is a plain method on a record, so the
//! dashboard decides where records live and how access is serialized.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and status enums
//! - [`product`] - Catalog records and form validation
//! - [`order`] - Orders, line items, filters and status counts
//! - [`chat`] - Contacts and messages
//! - [`loyalty`] - Points balance, earning rules and rewards
//! - [`sales`] - Single-unit sales and the daily ledger

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod chat;
pub mod loyalty;
pub mod order;
pub mod product;
pub mod sales;
pub mod types;

pub use types::*;
