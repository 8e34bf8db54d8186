//! Domain models for the customer layer.
//!
//! - [`contact`] - Registered shopper accounts and their inputs
//! - [`address`] - Postal addresses (contact-bound or free-standing)
//! - [`order`] - Order history entries and paging
//! - [`session`] - Session-stored identity and the session key names

pub mod address;
pub mod contact;
pub mod order;
pub mod session;

pub use address::{Address, AddressFields};
pub use contact::{Contact, ContactUpdate, CustomerOverview, NewContact};
pub use order::{Order, OrderPage, PagedResult};
pub use session::{CurrentContact, session_keys};
