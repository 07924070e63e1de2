use std::sync::{Mutex, PoisonError};

use crate::cookies::store::CookieStore;

/// Keeps the latest snapshot in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryCookieStore {
    snapshot: Mutex<Option<String>>,
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for InMemoryCookieStore {
    fn load(&self) -> anyhow::Result<Option<String>> {
        let snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(snapshot.clone())
    }

    fn persist(&self, blob: &str) -> anyhow::Result<()> {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        *snapshot = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        *snapshot = None;
        Ok(())
    }
}
