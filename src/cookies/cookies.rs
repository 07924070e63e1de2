//! Cookie core types.
//!
//! This module defines the **type-erased handles** used by callers and the
//! [`Cookie`] record every read operation of a jar returns.
//!
//! # Concurrency model
//! - [`CookieJarHandle`] is `Arc<dyn CookieJar + Send + Sync>`.
//!   - Jars carry their **own** lock. Every trait method takes `&self` and holds
//!     that lock for its whole body, so there is no read/write split for callers
//!     to get wrong.
//! - [`CookieStoreHandle`] is `Arc<dyn CookieStore + Send + Sync>`.
//!   - Stores are expected to manage their own internal synchronization as well.
//!
//! # Typical usage
//! ```ignore
//! let jar: CookieJarHandle = Arc::new(DefaultCookieJar::new());
//!
//! // Cookies for an outgoing request, most specific path first
//! let cookies = jar.select_for_request(&url);
//!
//! // Snapshot for a process restart
//! let blob = jar.save()?;
//! ```
//!
//! A [`Cookie`] is a detached copy: mutating it does not touch the jar.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;

use crate::cookies::store::CookieStore;
use crate::cookies::CookieJar;

/// A handle to a cookie jar trait.
///
/// Jars are internally synchronized, so the handle is a plain `Arc`.
pub type CookieJarHandle = Arc<dyn CookieJar + Send + Sync>;

/// A handle to a cookie store trait.
///
/// Store implementations must be **`Send + Sync` and internally synchronized**,
/// since callers hold only `&self` when invoking trait methods.
pub type CookieStoreHandle = Arc<dyn CookieStore + Send + Sync>;

/// SameSite policy of a cookie.
///
/// Older jar snapshots wrote `SameSite=Lax` style tags; those are accepted as aliases.
/// Anything else that is not a known tag decodes as [`SameSite::Unspecified`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SameSite {
    #[serde(alias = "SameSite=None")]
    None,
    #[serde(alias = "SameSite=Strict")]
    Strict,
    #[serde(alias = "SameSite=Lax")]
    Lax,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// A cookie as handed out by a jar.
///
/// This is the caller-facing view of a stored entry: jar-internal bookkeeping
/// (canonical host, sequence number, last access) is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value (not URL-decoded).
    pub value: String,

    /// Path scoping (e.g., `"/"`).
    pub path: String,

    /// Domain attribute exactly as supplied when the cookie was created.
    /// Empty for host-only cookies.
    pub domain: String,

    /// Expiration timestamp for persistent cookies, `None` for session cookies.
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires: Option<OffsetDateTime>,

    /// `Max-Age` attribute as received (0 when absent).
    pub max_age: i64,

    /// If `true`, cookie is sent only over HTTPS.
    pub secure: bool,

    /// If `true`, cookie is blocked from access by client-side scripts.
    pub http_only: bool,

    /// SameSite policy.
    pub same_site: SameSite,
}
