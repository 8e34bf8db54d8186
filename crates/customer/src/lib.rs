//! Storefront customer library.
//!
//! Resolves whether the current shopper is a logged-in contact or a guest and
//! routes every address, contact and order-history operation accordingly.
//! Logged-in contacts work on contact-bound records; guests get free-standing
//! billing and delivery addresses remembered by their session.
//!
//! The service itself ([`CustomerService`]) only depends on the collaborator
//! traits in [`ports`]. `PostgreSQL` and tower-sessions adapters are provided
//! in [`db`], [`session`] and [`services::auth`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ports;
pub mod services;
pub mod session;
pub mod telemetry;

pub use config::{ConfigError, CustomerConfig};
pub use error::{CustomerError, Result};
pub use services::{CustomerPorts, CustomerService, IdentityResolver};
