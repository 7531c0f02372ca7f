//! Persisted data model: the whole document is one JSON object keyed by customer id.

mod customer;
mod customer_id;
mod document;

pub use customer::{Customer, Visit};
pub use customer_id::CustomerId;
pub use document::StoreDocument;
