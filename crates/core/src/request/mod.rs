//! Request lifecycle - quota-bounded movie requests.
//!
//! A request is created pending and only ever moves to completed or
//! rejected, both terminal. Requests are the only durable entity the core
//! owns; everything else is recomputed per call.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteRequestStore;
pub use store::{RequestError, RequestStore};
pub use types::{NewRequest, QuotaStatus, Request, RequestStatus};
