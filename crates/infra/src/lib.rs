//! Infrastructure: document persistence, audit log, clinic settings and the
//! AI transport implementations.
//!
//! Persistence is a plain document store. Each entity type maps to a named
//! collection of JSON documents keyed by id; writes are last-write-wins and
//! the only batch primitive is [`store::Collection::put_many`]. There is no
//! optimistic concurrency and no cross-collection transaction.

pub mod ai_client;
pub mod audit;
pub mod documents;
pub mod repositories;
pub mod settings;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use ai_client::CannedSuggestionClient;
#[cfg(feature = "http-ai")]
pub use ai_client::HttpSuggestionClient;
pub use audit::AuditEntry;
pub use repositories::Repositories;
pub use settings::ClinicSettings;
pub use store::in_memory::InMemoryCollection;
pub use store::{Collection, Document, StoreError};
