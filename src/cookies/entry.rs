//! Stored cookie entries.
//!
//! An [`Entry`] is what the jar keeps per cookie. It is produced by the write
//! path (which owns the acceptance policy) and only ever read, touched
//! (`last_access`) or evicted by the jar itself.

use serde::{Deserialize, Deserializer, Serialize};
use time::macros::datetime;
use time::OffsetDateTime;

use crate::cookies::{Cookie, SameSite};

/// Expiry given to session cookies so that they pass every expiry filter.
pub const END_OF_TIME: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

/// One stored cookie.
///
/// The serialized field names are part of the jar's snapshot format and may
/// only ever be added to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    pub name: String,
    pub value: String,
    /// Domain attribute as supplied on creation; empty for host-only cookies.
    #[serde(rename = "Domain", alias = "OriginDomain")]
    pub origin_domain: String,
    pub path: String,
    /// Normalized host the entry is matched against.
    pub canonical_host: String,
    #[serde(with = "time::serde::rfc3339")]
    pub creation: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires: OffsetDateTime,
    pub max_age: i64,
    /// `true` when the cookie carried an explicit expiry.
    pub persistent: bool,
    pub secure: bool,
    pub http_only: bool,
    #[serde(default, deserialize_with = "same_site_or_unspecified")]
    pub same_site: SameSite,
    #[serde(with = "time::serde::rfc3339")]
    pub last_access: OffsetDateTime,
    /// Insertion order within a jar; only used to break sorting ties.
    pub seq_num: u64,
}

impl Entry {
    /// Creates a host-only session entry for `canonical_host` with path `/`.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        canonical_host: impl Into<String>,
        creation: OffsetDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            origin_domain: String::new(),
            path: "/".to_string(),
            canonical_host: canonical_host.into(),
            creation,
            expires: END_OF_TIME,
            max_age: 0,
            persistent: false,
            secure: false,
            http_only: false,
            same_site: SameSite::Unspecified,
            last_access: creation,
            seq_num: 0,
        }
    }

    /// Scopes the entry to a domain attribute, which also makes it match subdomains.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.origin_domain = domain.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Turns the entry into a persistent cookie expiring at `expires`.
    pub fn expiring_at(mut self, expires: OffsetDateTime) -> Self {
        self.persistent = true;
        self.expires = expires;
        self
    }

    /// Records the `Max-Age` attribute. The expiry it implies is set by the write path.
    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Identifier of the entry within its bucket.
    pub fn id(&self) -> String {
        format!("{};{};{}", self.canonical_host, self.path, self.name)
    }

    /// Host-only cookies were set without a domain attribute.
    pub fn host_only(&self) -> bool {
        self.origin_domain.is_empty()
    }

    /// Whether the entry must be sent with a request to `host` and `path`.
    ///
    /// `host` must be canonical. Secure entries are only sent over https.
    pub fn should_send(&self, https: bool, host: &str, path: &str) -> bool {
        self.domain_match(host) && self.path_match(path) && (https || !self.secure)
    }

    /// RFC 6265 §5.1.3 domain matching.
    fn domain_match(&self, host: &str) -> bool {
        if self.canonical_host == host {
            return true;
        }
        !self.host_only() && has_dot_suffix(host, &self.canonical_host)
    }

    /// RFC 6265 §5.1.4 path matching.
    fn path_match(&self, request_path: &str) -> bool {
        if request_path == self.path {
            return true;
        }
        if request_path.starts_with(&self.path) {
            // "/any/" matches "/any/path" and "/any" matches "/any/path".
            return self.path.ends_with('/')
                || request_path.as_bytes().get(self.path.len()) == Some(&b'/');
        }
        false
    }

    pub(crate) fn to_cookie(&self) -> Cookie {
        Cookie {
            name: self.name.clone(),
            value: self.value.clone(),
            path: self.path.clone(),
            domain: self.origin_domain.clone(),
            expires: self.persistent.then_some(self.expires),
            max_age: self.max_age,
            secure: self.secure,
            http_only: self.http_only,
            same_site: self.same_site,
        }
    }
}

/// `null` is read like an absent field.
fn same_site_or_unspecified<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SameSite, D::Error> {
    Ok(Option::<SameSite>::deserialize(deserializer)?.unwrap_or_default())
}

fn has_dot_suffix(s: &str, suffix: &str) -> bool {
    s.len() > suffix.len()
        && s.ends_with(suffix)
        && s.as_bytes()[s.len() - suffix.len() - 1] == b'.'
}
