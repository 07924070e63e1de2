use std::collections::HashMap;

use time::UtcOffset;

use crate::cookies::Entry;

/// Entries of one bucket, keyed by [`Entry::id`].
pub(crate) type Bucket = HashMap<String, Entry>;

/// The two-level map of a jar: bucket key → entry id → entry.
///
/// Not synchronized; the owning jar keeps it behind its lock. A bucket key that
/// is present always maps to a non-empty bucket.
#[derive(Debug, Default, Clone)]
pub(crate) struct EntryStore {
    buckets: HashMap<String, Bucket>,
    next_seq_num: u64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from decoded buckets, dropping empty ones.
    ///
    /// Sequence numbers continue after the highest one present.
    pub fn from_buckets(mut buckets: HashMap<String, Bucket>) -> Self {
        buckets.retain(|_, bucket| !bucket.is_empty());
        let next_seq_num = buckets
            .values()
            .flat_map(|bucket| bucket.values())
            .map(|e| e.seq_num + 1)
            .max()
            .unwrap_or(0);

        Self {
            buckets,
            next_seq_num,
        }
    }

    pub fn buckets(&self) -> &HashMap<String, Bucket> {
        &self.buckets
    }

    /// All resident entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.buckets.values().flat_map(|bucket| bucket.values())
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    /// Runs `f` on the bucket stored under `key` and unregisters the bucket
    /// if `f` leaves it empty. Returns `None` when there is no such bucket.
    pub fn with_bucket<R>(&mut self, key: &str, f: impl FnOnce(&mut Bucket) -> R) -> Option<R> {
        let bucket = self.buckets.get_mut(key)?;
        let result = f(bucket);
        if bucket.is_empty() {
            self.buckets.remove(key);
        }
        Some(result)
    }

    /// Inserts `entry` into bucket `key`, replacing any entry with the same id.
    ///
    /// A replaced entry hands its creation time and sequence number down to its
    /// successor; a new entry gets the next sequence number. Timestamps are
    /// stored in UTC so every resident entry can be written to a snapshot.
    pub fn upsert(&mut self, key: String, mut entry: Entry) {
        entry.creation = entry.creation.to_offset(UtcOffset::UTC);
        entry.expires = entry.expires.to_offset(UtcOffset::UTC);
        entry.last_access = entry.last_access.to_offset(UtcOffset::UTC);

        let id = entry.id();
        let bucket = self.buckets.entry(key).or_default();

        match bucket.get(&id) {
            Some(old) => {
                entry.creation = old.creation;
                entry.seq_num = old.seq_num;
            }
            None => {
                entry.seq_num = self.next_seq_num;
                self.next_seq_num += 1;
            }
        }

        bucket.insert(id, entry);
    }

    /// Swaps in the contents of `other`. Sequence numbers never go backwards,
    /// even when `other` was decoded from an older or empty snapshot.
    pub fn replace_with(&mut self, other: EntryStore) {
        let next_seq_num = self.next_seq_num.max(other.next_seq_num);
        *self = other;
        self.next_seq_num = next_seq_num;
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::Duration;

    fn entry(name: &str, value: &str) -> Entry {
        Entry::new(name, value, "example.com", datetime!(2025-01-01 0:00 UTC))
    }

    #[test]
    fn upsert_assigns_increasing_seq_nums() {
        let mut store = EntryStore::new();
        store.upsert("example.com".into(), entry("a", "1"));
        store.upsert("example.com".into(), entry("b", "2"));
        store.upsert("other.org".into(), entry("c", "3"));

        let mut seqs: Vec<_> = store.entries().map(|e| (e.name.clone(), e.seq_num)).collect();
        seqs.sort();
        assert_eq!(
            seqs,
            vec![("a".to_string(), 0), ("b".to_string(), 1), ("c".to_string(), 2)]
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn upsert_keeps_creation_and_seq_of_replaced_entry() {
        let mut store = EntryStore::new();
        store.upsert("example.com".into(), entry("a", "1"));
        store.upsert("example.com".into(), entry("b", "2"));

        let mut newer = entry("a", "changed");
        newer.creation += Duration::hours(1);
        store.upsert("example.com".into(), newer);

        let a = store.entries().find(|e| e.name == "a").unwrap();
        assert_eq!(a.value, "changed");
        assert_eq!(a.seq_num, 0);
        assert_eq!(a.creation, datetime!(2025-01-01 0:00 UTC));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn upsert_stores_timestamps_in_utc() {
        let odd = UtcOffset::from_hms(5, 30, 15).unwrap();
        let t = datetime!(2025-01-01 0:00 UTC);
        let mut store = EntryStore::new();
        store.upsert(
            "example.com".into(),
            Entry::new("a", "1", "example.com", t.to_offset(odd)).expiring_at(t.to_offset(odd)),
        );

        let a = store.entries().next().unwrap();
        assert_eq!(a.creation, t);
        assert_eq!(a.creation.offset(), UtcOffset::UTC);
        assert_eq!(a.expires.offset(), UtcOffset::UTC);
        assert_eq!(a.last_access.offset(), UtcOffset::UTC);
    }

    #[test]
    fn replace_with_never_reissues_seq_nums() {
        let mut store = EntryStore::new();
        for name in ["a", "b", "c"] {
            store.upsert("example.com".into(), entry(name, "1"));
        }

        store.replace_with(EntryStore::new());
        assert_eq!(store.len(), 0);

        store.upsert("example.com".into(), entry("d", "1"));
        assert_eq!(store.entries().next().unwrap().seq_num, 3);
    }

    #[test]
    fn with_bucket_unregisters_emptied_bucket() {
        let mut store = EntryStore::new();
        store.upsert("example.com".into(), entry("a", "1"));

        let removed = store.with_bucket("example.com", |bucket| bucket.drain().count());
        assert_eq!(removed, Some(1));
        assert!(store.buckets().is_empty());
        assert_eq!(store.with_bucket("example.com", |_| ()), None);
    }

    #[test]
    fn from_buckets_continues_sequence_and_drops_empty_buckets() {
        let mut e = entry("a", "1");
        e.seq_num = 41;
        let mut bucket = Bucket::new();
        bucket.insert(e.id(), e);

        let mut buckets = HashMap::new();
        buckets.insert("example.com".to_string(), bucket);
        buckets.insert("empty.org".to_string(), Bucket::new());

        let mut store = EntryStore::from_buckets(buckets);
        assert_eq!(store.buckets().len(), 1);

        store.upsert("example.com".into(), entry("b", "2"));
        let b = store.entries().find(|e| e.name == "b").unwrap();
        assert_eq!(b.seq_num, 42);
    }
}
