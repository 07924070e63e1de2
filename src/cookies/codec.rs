//! Snapshot format of a jar.
//!
//! A snapshot is a JSON object mapping bucket key → entry id → [`Entry`]. Keys
//! are written in sorted order so identical jars produce identical blobs.
//! Unknown fields are ignored when reading, so newer snapshots load in older
//! builds.

use std::collections::{BTreeMap, HashMap};

use crate::cookies::entries::{Bucket, EntryStore};
use crate::cookies::Entry;
use crate::errors::CookieError;

pub(crate) fn encode(store: &EntryStore) -> Result<String, CookieError> {
    let sorted: BTreeMap<&str, BTreeMap<&str, &Entry>> = store
        .buckets()
        .iter()
        .map(|(key, bucket)| {
            let entries = bucket.iter().map(|(id, e)| (id.as_str(), e)).collect();
            (key.as_str(), entries)
        })
        .collect();

    serde_json::to_string(&sorted).map_err(CookieError::Encode)
}

pub(crate) fn decode(blob: &str) -> Result<EntryStore, CookieError> {
    let buckets: HashMap<String, Bucket> = serde_json::from_str(blob).map_err(CookieError::Decode)?;
    Ok(EntryStore::from_buckets(buckets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::SameSite;
    use time::macros::datetime;

    fn sample_store() -> EntryStore {
        let t = datetime!(2025-03-04 05:06:07.123456789 UTC);
        let mut store = EntryStore::new();
        store.upsert(
            "example.com".into(),
            Entry::new("sid", "abc", "example.com", t)
                .with_domain(".example.com")
                .with_path("/app")
                .expiring_at(datetime!(2030-01-01 0:00 UTC))
                .with_max_age(3600)
                .with_secure(true)
                .with_http_only(true)
                .with_same_site(SameSite::Strict),
        );
        store.upsert("example.org".into(), Entry::new("pref", "dark", "www.example.org", t));
        store
    }

    #[test]
    fn encode_then_decode_preserves_every_field() {
        let store = sample_store();
        let blob = encode(&store).unwrap();
        let decoded = decode(&blob).unwrap();

        assert_eq!(decoded.buckets(), store.buckets());
    }

    #[test]
    fn encoding_is_deterministic() {
        let store = sample_store();
        assert_eq!(encode(&store).unwrap(), encode(&store.clone()).unwrap());
    }

    #[test]
    fn empty_store_encodes_as_empty_object() {
        assert_eq!(encode(&EntryStore::new()).unwrap(), "{}");
        assert!(decode("{}").unwrap().buckets().is_empty());
    }

    #[test]
    fn decode_ignores_unknown_fields_and_tags() {
        let blob = r#"{
            "example.com": {
                "example.com;/;a": {
                    "Name": "a", "Value": "1", "Domain": "", "Path": "/",
                    "CanonicalHost": "example.com",
                    "Creation": "2025-01-01T08:00:00.5+08:00",
                    "Expires": "9999-12-31T23:59:59Z",
                    "MaxAge": 0, "Persistent": false, "Secure": false, "HttpOnly": false,
                    "SameSite": "SameSite=Lax",
                    "LastAccess": "2025-01-01T00:00:00Z",
                    "SeqNum": 7,
                    "HostOnly": true,
                    "Priority": "High"
                },
                "example.com;/;b": {
                    "Name": "b", "Value": "2", "OriginDomain": "example.com", "Path": "/",
                    "CanonicalHost": "example.com",
                    "Creation": "2025-01-01T00:00:00Z",
                    "Expires": "2025-01-02T00:00:00Z",
                    "MaxAge": 0, "Persistent": true, "Secure": false, "HttpOnly": false,
                    "SameSite": "Sideways",
                    "LastAccess": "2025-01-01T00:00:00Z",
                    "SeqNum": 8
                }
            },
            "extra": {}
        }"#;

        let store = decode(blob).unwrap();
        assert_eq!(store.buckets().len(), 1);

        let bucket = &store.buckets()["example.com"];
        let a = &bucket["example.com;/;a"];
        assert_eq!(a.same_site, SameSite::Lax);
        assert_eq!(a.creation, datetime!(2025-01-01 0:00:00.5 UTC));
        assert_eq!(a.seq_num, 7);

        let b = &bucket["example.com;/;b"];
        assert_eq!(b.origin_domain, "example.com");
        assert_eq!(b.same_site, SameSite::Unspecified);
    }

    #[test]
    fn decode_defaults_missing_same_site() {
        let blob = r#"{"h":{"h;/;n":{
            "Name":"n","Value":"v","Domain":"","Path":"/","CanonicalHost":"h",
            "Creation":"2025-01-01T00:00:00Z","Expires":"2025-01-01T00:00:00Z",
            "MaxAge":-1,"Persistent":true,"Secure":false,"HttpOnly":false,
            "LastAccess":"2025-01-01T00:00:00Z","SeqNum":0}}}"#;

        let store = decode(blob).unwrap();
        let e = &store.buckets()["h"]["h;/;n"];
        assert_eq!(e.same_site, SameSite::Unspecified);
        assert_eq!(e.max_age, -1);
    }

    #[test]
    fn decode_treats_null_same_site_as_unspecified() {
        let blob = r#"{"h":{"h;/;n":{
            "Name":"n","Value":"v","Domain":"","Path":"/","CanonicalHost":"h",
            "Creation":"2025-01-01T00:00:00Z","Expires":"2025-01-01T00:00:00Z",
            "MaxAge":0,"Persistent":true,"Secure":false,"HttpOnly":false,
            "SameSite":null,"LastAccess":"2025-01-01T00:00:00Z","SeqNum":0}}}"#;

        let store = decode(blob).unwrap();
        assert_eq!(store.buckets()["h"]["h;/;n"].same_site, SameSite::Unspecified);
    }

    #[test]
    fn decode_rejects_malformed_blobs() {
        for blob in ["", "{", "[]", r#"{"a": 1}"#, r#"{"a":{"id":{"Name":"x"}}}"#] {
            let err = decode(blob).unwrap_err();
            assert!(matches!(err, CookieError::Decode(_)), "{blob:?} gave {err}");
        }
    }
}
