//! Process-wide persisted properties.
//!
//! A handful of durable flags live under fixed keys in their own store.
//! The migration only needs one: the asset-import idempotency flag.

use std::sync::Arc;

use asset_migration_types::{decode, encode};
use snafu::ResultExt;

use crate::{
    error::{CodecSnafu, KvSnafu, Result},
    kv::KvStore,
};

/// Key of the asset-import idempotency flag.
const ASSET_IMPORT_DONE_KEY: &[u8] = b"ALLOW_ASSET_IMPORT";

/// Typed store over persisted process-wide properties.
///
/// Values are postcard-encoded and readable immediately after write.
pub struct PropertiesStore<S> {
    inner: Arc<S>,
}

impl<S: KvStore> PropertiesStore<S> {
    /// Creates a properties store over a key-value backend.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// Reads the asset-import idempotency flag.
    ///
    /// A missing key reads as 0 (migration not yet run).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the read or decode fails.
    pub fn asset_import_done(&self) -> Result<u64> {
        match self.inner.get(ASSET_IMPORT_DONE_KEY).context(KvSnafu)? {
            Some(bytes) => decode(&bytes).context(CodecSnafu),
            None => Ok(0),
        }
    }

    /// Persists the asset-import idempotency flag.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the encode or write fails.
    pub fn set_asset_import_done(&self, value: u64) -> Result<()> {
        let bytes = encode(&value).context(CodecSnafu)?;
        self.inner.put(ASSET_IMPORT_DONE_KEY, &bytes).context(KvSnafu)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    #[test]
    fn test_missing_flag_reads_zero() {
        let store = PropertiesStore::new(Arc::new(InMemoryStore::new()));
        assert_eq!(store.asset_import_done().unwrap(), 0);
    }

    #[test]
    fn test_flag_readable_immediately_after_write() {
        let store = PropertiesStore::new(Arc::new(InMemoryStore::new()));
        store.set_asset_import_done(1).unwrap();
        assert_eq!(store.asset_import_done().unwrap(), 1);
    }

    #[test]
    fn test_flag_overwrite() {
        let store = PropertiesStore::new(Arc::new(InMemoryStore::new()));
        store.set_asset_import_done(1).unwrap();
        store.set_asset_import_done(0).unwrap();
        assert_eq!(store.asset_import_done().unwrap(), 0);
    }
}
