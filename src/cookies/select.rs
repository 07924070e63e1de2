//! Read paths over an [`EntryStore`].
//!
//! All functions expect the caller to hold the jar's lock for their whole
//! duration and to pass in a single `now` captured at the start of the call.

use std::cmp::Ordering;

use time::OffsetDateTime;
use url::Url;

use crate::cookies::entries::EntryStore;
use crate::cookies::{canonical_host, jar_key, Entry, PublicSuffixList};

/// Every resident entry, expired or not, in dump order. Does not mutate.
pub(crate) fn all_entries(store: &EntryStore) -> Vec<Entry> {
    let mut selected: Vec<Entry> = store.entries().cloned().collect();
    selected.sort_by(dump_order);
    selected
}

/// Entries expiring strictly after `now`, in dump order.
///
/// Expired entries are skipped but stay resident; only a request touching
/// their bucket evicts them.
pub(crate) fn unexpired_entries(store: &EntryStore, now: OffsetDateTime) -> Vec<Entry> {
    let mut selected: Vec<Entry> = store
        .entries()
        .filter(|e| e.expires > now)
        .cloned()
        .collect();
    selected.sort_by(dump_order);
    selected
}

/// Entries to send with a request to `url`, most specific first.
///
/// Dead persistent entries of the request's bucket are evicted on the way and
/// every selected entry has its `last_access` set to `now`. Unsupported schemes
/// and malformed hosts select nothing.
pub(crate) fn select_for_request(
    store: &mut EntryStore,
    url: &Url,
    psl: Option<&dyn PublicSuffixList>,
    now: OffsetDateTime,
) -> Vec<Entry> {
    let https = match url.scheme() {
        "https" => true,
        "http" => false,
        scheme => {
            log::trace!("no cookies for unsupported scheme {scheme:?}");
            return Vec::new();
        }
    };

    let host = match canonical_host(url.host_str().unwrap_or_default()) {
        Ok(host) => host,
        Err(e) => {
            log::trace!("no cookies for {url}: {e}");
            return Vec::new();
        }
    };
    let key = jar_key(&host, psl);

    let path = match url.path() {
        "" => "/",
        path => path,
    };

    let mut evicted = 0usize;
    let mut selected = Vec::new();

    let touched = store.with_bucket(&key, |bucket| {
        bucket.retain(|_, e| {
            if e.persistent && e.expires <= now {
                evicted += 1;
                return false;
            }
            if e.should_send(https, &host, path) {
                e.last_access = now;
                selected.push(e.clone());
            }
            true
        });
    });

    if touched.is_none() {
        return Vec::new();
    }
    if evicted > 0 {
        log::debug!("evicted {evicted} expired cookie(s) from bucket {key:?}");
    }

    // RFC 6265 §5.4 point 2: longest path first, then earliest creation.
    selected.sort_by(|a, b| {
        b.path
            .len()
            .cmp(&a.path.len())
            .then_with(|| a.creation.cmp(&b.creation))
            .then_with(|| a.seq_num.cmp(&b.seq_num))
    });

    selected
}

fn dump_order(a: &Entry, b: &Entry) -> Ordering {
    a.canonical_host
        .cmp(&b.canonical_host)
        .then_with(|| b.path.len().cmp(&a.path.len()))
        .then_with(|| a.creation.cmp(&b.creation))
        // Not required by any RFC, but keeps dumps deterministic.
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.value.cmp(&b.value))
        .then_with(|| a.seq_num.cmp(&b.seq_num))
}
