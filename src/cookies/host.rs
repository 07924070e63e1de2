//! Host canonicalization and bucket keys.
//!
//! These are the engine-side collaborators of the jar: they turn a request host
//! into the form entries are matched against, and decide which bucket a host's
//! cookies live in. The rules follow RFC 6265 §5.1.2 and the public suffix
//! boundary handling browsers apply.

use std::net::{IpAddr, Ipv6Addr};

use url::Host;

use crate::errors::CookieError;

/// A public suffix list, e.g. one generated from <https://publicsuffix.org/>.
///
/// Implementations must be cheap to query; the jar asks once per insert and
/// once per request.
pub trait PublicSuffixList: Send + Sync {
    /// Returns the public suffix of `domain`: `"co.uk"` for `"www.example.co.uk"`.
    ///
    /// `domain` is already canonical (lower-case ASCII, no trailing dot).
    fn public_suffix(&self, domain: &str) -> String;

    /// Name of the list, used in diagnostics.
    fn name(&self) -> String;
}

/// Normalizes a `host[:port]` string into the canonical host used for matching.
///
/// The port and IPv6 brackets are stripped, one trailing dot is removed and
/// internationalized names are punycode-encoded and lower-cased.
pub fn canonical_host(host_port: &str) -> Result<String, CookieError> {
    let invalid = || CookieError::InvalidHost(host_port.to_string());

    let host = strip_port(host_port).ok_or_else(invalid)?;
    let host = host.strip_suffix('.').unwrap_or(host);

    // Bare IPv6 literals are not valid URL hosts, but they are valid hosts.
    if let Ok(addr) = host.parse::<Ipv6Addr>() {
        return Ok(addr.to_string());
    }

    match Host::parse(host) {
        Ok(Host::Domain(domain)) if !domain.is_empty() => Ok(domain.to_ascii_lowercase()),
        Ok(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Ok(Host::Ipv6(addr)) => Ok(addr.to_string()),
        _ => Err(invalid()),
    }
}

/// Returns the bucket key for a canonical `host`.
///
/// IP addresses are their own key. With a public suffix list the key is the
/// suffix plus one label (`"example.co.uk"`); without one it is the last two
/// labels. Whenever the host cannot be split sensibly, the host itself is used.
pub fn jar_key(host: &str, psl: Option<&dyn PublicSuffixList>) -> String {
    if is_ip(host) {
        return host.to_string();
    }

    // Index of the dot in front of the public suffix.
    let dot = match psl {
        None => match host.rfind('.') {
            Some(i) if i > 0 => i,
            _ => return host.to_string(),
        },
        Some(psl) => {
            let suffix = psl.public_suffix(host);
            if suffix == host || suffix.len() >= host.len() || !host.ends_with(&suffix) {
                return host.to_string();
            }
            let i = host.len() - suffix.len();
            if host.as_bytes()[i - 1] != b'.' {
                // The list disagrees with the host's label boundaries.
                return host.to_string();
            }
            i - 1
        }
    };

    match host[..dot].rfind('.') {
        Some(prev) => host[prev + 1..].to_string(),
        None => host.to_string(),
    }
}

pub(crate) fn is_ip(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok()
}

/// Strips the port from `host_port`. Returns `None` for a malformed bracket form.
fn strip_port(host_port: &str) -> Option<&str> {
    match host_port.matches(':').count() {
        0 => Some(host_port),
        1 => host_port.split_once(':').map(|(host, _)| host),
        _ if host_port.starts_with('[') => {
            let end = host_port.find(']')?;
            let rest = &host_port[end + 1..];
            if rest.is_empty() || rest.starts_with(':') {
                Some(&host_port[..=end])
            } else {
                None
            }
        }
        _ => Some(host_port),
    }
}
