//! Client-side HTTP cookie storage for the Gosub engine.
//!
//! The crate keeps the cookies of one jar in a two-level map (bucket key, entry id)
//! behind a single lock and offers:
//! - whole-jar dumps, with and without expired entries,
//! - per-request selection that matches cookies for a URL and evicts dead ones,
//! - a JSON save/load round trip of the entire jar, plus persistence backends.
//!
//! Deciding *whether* an inbound cookie is accepted is left to the caller's
//! write path; this crate stores what it is given via
//! [`CookieJar::insert`](cookies::CookieJar::insert).

pub mod config;
pub mod cookies;
pub mod errors;

pub use config::JarConfig;
pub use errors::CookieError;
