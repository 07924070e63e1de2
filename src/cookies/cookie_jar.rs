//! Cookie jar abstraction and the in-memory implementation.
//!
//! A **cookie jar** holds all cookies of one browsing profile. The engine hands
//! it already-accepted entries and asks it which cookies to attach to a request.
//!
//! [`DefaultCookieJar`] keeps its entries in memory, bucketed by the
//! registrable domain of their host (see [`jar_key`]). One mutex guards the
//! whole jar and every operation holds it from start to finish, so a caller
//! never observes a half-evicted bucket or a partly applied snapshot.
//!
//! See also: RFC 6265bis (HTTP State Management Mechanism).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use time::OffsetDateTime;
use url::Url;

use crate::config::JarConfig;
use crate::cookies::entries::EntryStore;
use crate::cookies::{codec, select};
use crate::cookies::{jar_key, Cookie, CookieJarHandle, Entry};
use crate::errors::CookieError;

/// A cookie jar keeps the cookies for one profile.
///
/// Implementations are internally synchronized; all methods take `&self`.
pub trait CookieJar: Send + Sync {
    /// Returns every stored cookie, including expired ones that have not been
    /// evicted yet.
    ///
    /// Ordered by host, then longest path, then creation time.
    fn get_all_cookies(&self) -> Vec<Cookie>;

    /// Like [`get_all_cookies`](Self::get_all_cookies) but without cookies whose
    /// expiry is not strictly in the future. Does not evict anything.
    fn get_cookies(&self) -> Vec<Cookie>;

    /// Returns the cookies to attach to a request for `url`, longest path first
    /// and then oldest first.
    ///
    /// Expired persistent cookies in the request's bucket are evicted as a side
    /// effect. Unsupported schemes and malformed hosts yield no cookies.
    fn select_for_request(&self, url: &Url) -> Vec<Cookie>;

    /// Stores an entry produced by the write path, replacing an entry with the
    /// same name, host and path.
    fn insert(&self, entry: Entry) -> Result<(), CookieError>;

    /// Removes all cookies from the jar.
    fn clear(&self);

    /// Serializes the complete jar, bookkeeping included.
    fn save(&self) -> Result<String, CookieError>;

    /// Replaces the complete jar with a snapshot produced by [`save`](Self::save).
    ///
    /// On error the jar is left exactly as it was.
    fn load(&self, blob: &str) -> Result<(), CookieError>;
}

/// Default cookie jar which holds cookies in memory only.
#[derive(Debug, Default)]
pub struct DefaultCookieJar {
    config: JarConfig,
    entries: Mutex<EntryStore>,
}

impl DefaultCookieJar {
    /// Creates an empty jar without a public suffix list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: JarConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(EntryStore::new()),
        }
    }

    pub fn config(&self) -> &JarConfig {
        &self.config
    }

    /// Number of resident entries, dead ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, EntryStore> {
        // Poisoning only means another caller panicked; the map itself is still valid.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn get_cookies_at(&self, now: OffsetDateTime) -> Vec<Cookie> {
        let entries = self.lock();
        to_cookies(select::unexpired_entries(&entries, now))
    }

    pub(crate) fn select_for_request_at(&self, url: &Url, now: OffsetDateTime) -> Vec<Cookie> {
        let psl = self.config.public_suffix_list.as_deref();
        let mut entries = self.lock();
        to_cookies(select::select_for_request(&mut entries, url, psl, now))
    }
}

impl CookieJar for DefaultCookieJar {
    fn get_all_cookies(&self) -> Vec<Cookie> {
        let entries = self.lock();
        to_cookies(select::all_entries(&entries))
    }

    fn get_cookies(&self) -> Vec<Cookie> {
        self.get_cookies_at(OffsetDateTime::now_utc())
    }

    fn select_for_request(&self, url: &Url) -> Vec<Cookie> {
        self.select_for_request_at(url, OffsetDateTime::now_utc())
    }

    fn insert(&self, entry: Entry) -> Result<(), CookieError> {
        if entry.canonical_host.is_empty() {
            return Err(CookieError::InvalidHost(entry.canonical_host));
        }
        let key = jar_key(&entry.canonical_host, self.config.public_suffix_list.as_deref());
        self.lock().upsert(key, entry);
        Ok(())
    }

    fn clear(&self) {
        self.lock().clear();
    }

    fn save(&self) -> Result<String, CookieError> {
        let entries = self.lock();
        codec::encode(&entries)
    }

    fn load(&self, blob: &str) -> Result<(), CookieError> {
        let mut entries = self.lock();
        match codec::decode(blob) {
            Ok(decoded) => {
                entries.replace_with(decoded);
                Ok(())
            }
            Err(e) => {
                log::warn!("discarding cookies in invalid format: {e}");
                Err(e)
            }
        }
    }
}

impl From<DefaultCookieJar> for CookieJarHandle {
    fn from(jar: DefaultCookieJar) -> Self {
        Arc::new(jar)
    }
}

fn to_cookies(entries: Vec<Entry>) -> Vec<Cookie> {
    entries.iter().map(Entry::to_cookie).collect()
}
