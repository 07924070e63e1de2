use std::sync::{Mutex, PoisonError};

use time::OffsetDateTime;
use url::Url;

use crate::cookies::cookie_jar::DefaultCookieJar;
use crate::cookies::{Cookie, CookieJar, CookieStoreHandle, Entry};
use crate::errors::CookieError;

/// A `CookieJar` decorator that persists a snapshot after each mutation.
///
/// This type is *transparent* for reads but *eagerly* persists after writes.
/// Persisting is best-effort: failures are logged and the in-memory jar stays
/// authoritative.
///
/// Requests persist only when they evict something. Last-access times they
/// record reach the store with the next write or [`flush`](Self::flush).
pub struct PersistentCookieJar {
    /// Inner cookie jar that holds the actual cookie state.
    inner: DefaultCookieJar,
    /// Handle to the cookie store responsible for persistence.
    store_handle: CookieStoreHandle,
    /// Held across a mutation and its persist so snapshots reach the store in order.
    write_lock: Mutex<()>,
}

impl PersistentCookieJar {
    /// Opens an empty in-memory jar and restores it from `store_handle`.
    pub fn open(store_handle: CookieStoreHandle) -> Self {
        Self::wrap(DefaultCookieJar::new(), store_handle)
    }

    /// Wraps `jar` and replaces its contents with the snapshot in `store_handle`, if any.
    ///
    /// A snapshot that cannot be read or decoded is logged and ignored.
    pub fn wrap(jar: DefaultCookieJar, store_handle: CookieStoreHandle) -> Self {
        match store_handle.load() {
            Ok(Some(blob)) => {
                if let Err(e) = jar.load(&blob) {
                    log::debug!("starting with an empty cookie jar: {e}");
                }
            }
            Ok(None) => {}
            Err(e) => log::warn!("cannot restore cookie jar: {e:#}"),
        }

        Self {
            inner: jar,
            store_handle,
            write_lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &DefaultCookieJar {
        &self.inner
    }

    /// Snapshots the inner jar and persists it to the backing store.
    fn persist(&self) {
        let blob = match self.inner.save() {
            Ok(blob) => blob,
            Err(e) => {
                log::warn!("cannot snapshot cookie jar: {e}");
                return;
            }
        };

        if let Err(e) = self.store_handle.persist(&blob) {
            log::warn!("cannot persist cookie jar: {e:#}");
        }
    }

    /// Persists the current state now, reporting failures instead of logging them.
    ///
    /// Meant for explicit flush points such as shutdown.
    pub fn flush(&self) -> Result<(), CookieError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let blob = self.inner.save()?;
        self.store_handle.persist(&blob)?;
        Ok(())
    }

    /// Runs `f` against the inner jar and persists afterwards if `f` reports a change.
    fn mutate<R>(&self, f: impl FnOnce(&DefaultCookieJar) -> (R, bool)) -> R {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (result, changed) = f(&self.inner);
        if changed {
            self.persist();
        }
        result
    }

    pub(crate) fn select_for_request_at(&self, url: &Url, now: OffsetDateTime) -> Vec<Cookie> {
        self.mutate(|jar| {
            let before = jar.len();
            let selected = jar.select_for_request_at(url, now);
            let evicted = jar.len() != before;
            (selected, evicted)
        })
    }
}

impl CookieJar for PersistentCookieJar {
    /// Returns all cookies without persisting.
    fn get_all_cookies(&self) -> Vec<Cookie> {
        self.inner.get_all_cookies()
    }

    /// Returns unexpired cookies without persisting.
    fn get_cookies(&self) -> Vec<Cookie> {
        self.inner.get_cookies()
    }

    /// Selects cookies for `url`, then persists if anything was evicted.
    fn select_for_request(&self, url: &Url) -> Vec<Cookie> {
        self.select_for_request_at(url, OffsetDateTime::now_utc())
    }

    /// Stores an entry, then persists the updated state.
    fn insert(&self, entry: Entry) -> Result<(), CookieError> {
        self.mutate(|jar| {
            let result = jar.insert(entry);
            let changed = result.is_ok();
            (result, changed)
        })
    }

    /// Clears all cookies in the jar, then persists the updated state.
    fn clear(&self) {
        self.mutate(|jar| {
            jar.clear();
            ((), true)
        })
    }

    fn save(&self) -> Result<String, CookieError> {
        self.inner.save()
    }

    /// Replaces the jar from `blob`, then persists it. Nothing is persisted on error.
    fn load(&self, blob: &str) -> Result<(), CookieError> {
        self.mutate(|jar| {
            let result = jar.load(blob);
            let changed = result.is_ok();
            (result, changed)
        })
    }
}
