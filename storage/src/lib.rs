//! Storage crate: customer records persisted to a JSON document.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – CustomerId, Customer, Visit, StoreDocument
//! - [`customer_store`] – CustomerStore (file-backed, thread-safe)

mod customer_store;
mod error;
mod models;


pub use customer_store::{CustomerStore, LinkOutcome};
pub use error::StorageError;
pub use models::{Customer, CustomerId, StoreDocument, Visit};
