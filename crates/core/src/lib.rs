//! Storefront Customer Core - Shared types library.
//!
//! This crate provides the types shared by the customer service and its
//! tooling:
//! - `storefront-customer` - Identity resolution and dual-mode address service
//! - `storefront-customer-cli` - Migrations and configuration checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! session handling. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, address roles, shopper identity, emails and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
