//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password hashing and session login of contacts
//! - `customer` - Identity resolution, dual-mode addresses, registration, orders

pub mod auth;
pub mod customer;

pub use customer::{CustomerPorts, CustomerService, IdentityResolver};
