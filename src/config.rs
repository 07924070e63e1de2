//! Cookie jar configuration.
//!
//! `JarConfig` controls how a [`DefaultCookieJar`](crate::cookies::DefaultCookieJar)
//! partitions its entries. Today that is only the public suffix list used to
//! compute bucket keys; without one, the jar falls back to "last two labels".
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_cookies::JarConfig;
//! let cfg = JarConfig::default();
//! assert!(cfg.public_suffix_list.is_none());
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::sync::Arc;
//! use gosub_cookies::JarConfig;
//! use gosub_cookies::cookies::PublicSuffixList;
//!
//! struct CoUk;
//! impl PublicSuffixList for CoUk {
//!     fn public_suffix(&self, domain: &str) -> String {
//!         if domain.ends_with(".co.uk") { "co.uk".into() } else {
//!             domain.rsplit('.').next().unwrap_or(domain).into()
//!         }
//!     }
//!     fn name(&self) -> String { "co.uk-only".into() }
//! }
//!
//! let cfg = JarConfig::builder().public_suffix_list(Arc::new(CoUk)).build();
//! assert!(cfg.public_suffix_list.is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::cookies::PublicSuffixList;

#[derive(Clone, Default)]
pub struct JarConfig {
    /// Public suffix list used to derive bucket keys. `None` uses the two-label fallback.
    pub public_suffix_list: Option<Arc<dyn PublicSuffixList>>,
}

impl fmt::Debug for JarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JarConfig")
            .field(
                "public_suffix_list",
                &self.public_suffix_list.as_ref().map(|psl| psl.name()),
            )
            .finish()
    }
}

impl JarConfig {
    pub fn builder() -> JarConfigBuilder {
        JarConfigBuilder::default()
    }
}

/// Builder for [`JarConfig`], mirroring the engine's other config builders.
#[derive(Debug, Clone, Default)]
pub struct JarConfigBuilder {
    inner: JarConfig,
}

impl JarConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut JarConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn public_suffix_list(self, psl: Arc<dyn PublicSuffixList>) -> Self {
        self.map(|c| c.public_suffix_list = Some(psl))
    }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut JarConfig)) -> Self {
        self.map(f)
    }

    pub fn build(self) -> JarConfig {
        self.inner
    }
}
