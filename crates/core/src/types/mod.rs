//! Core types for the storefront customer layer.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address_type;
pub mod email;
pub mod id;
pub mod identity;
pub mod price;
pub mod status;

pub use address_type::{AddressType, AddressTypeError};
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::Identity;
pub use price::{CurrencyCode, Price};
pub use status::OrderStatus;
