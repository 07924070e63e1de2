//! Cookies: [`CookieJar`], [`CookieStore`] and backends.

mod codec;
mod cookie_jar;
mod cookies;
mod entries;
mod entry;
mod host;
mod persistent_cookie_jar;
mod select;
mod store;

pub use cookies::Cookie;
pub use cookies::CookieJarHandle;
pub use cookies::CookieStoreHandle;
pub use cookies::SameSite;

pub use entry::{Entry, END_OF_TIME};
pub use host::{canonical_host, jar_key, PublicSuffixList};

pub use cookie_jar::CookieJar;
pub use cookie_jar::DefaultCookieJar;
pub use persistent_cookie_jar::PersistentCookieJar;

pub use store::CookieStore;
pub use store::InMemoryCookieStore;
pub use store::JsonCookieStore;
