//! Cookie store infrastructure.
//!
//! A **cookie store** is the durable home of a jar's snapshot (the blob
//! produced by [`CookieJar::save`](crate::cookies::CookieJar::save)). Stores
//! never interpret the blob; restoring it is the jar's job.
//!
//! This module exports two implementations:
//! - [`InMemoryCookieStore`]: keeps the latest snapshot in memory (tests, private profiles).
//! - [`JsonCookieStore`]: file-backed store (one JSON file per profile).
//!
//! Stores are usually not used directly but through a
//! [`PersistentCookieJar`](crate::cookies::PersistentCookieJar), which writes a
//! fresh snapshot after every mutation.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use gosub_cookies::cookies::{CookieJar, JsonCookieStore, PersistentCookieJar};
//!
//! let store = Arc::new(JsonCookieStore::new("cookies.json".into()));
//! let jar = PersistentCookieJar::open(store);
//! let _ = jar.get_cookies();
//! ```
mod in_memory;
mod json;

/// In-memory snapshot store.
pub use in_memory::InMemoryCookieStore;
/// File-backed JSON snapshot store.
pub use json::JsonCookieStore;

/// Durable storage for jar snapshots.
///
/// Implementations must be `Send + Sync` and safe for concurrent use.
pub trait CookieStore: Send + Sync {
    /// Returns the most recently persisted snapshot, or `None` if nothing was
    /// persisted yet.
    fn load(&self) -> anyhow::Result<Option<String>>;

    /// Replaces the persisted snapshot with `blob`.
    fn persist(&self, blob: &str) -> anyhow::Result<()>;

    /// Forgets the persisted snapshot. Idempotent.
    fn clear(&self) -> anyhow::Result<()>;
}
