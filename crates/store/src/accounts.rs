//! Typed stores for account and account-asset records.
//!
//! Thin wrappers pairing a [`KvStore`] with the record codec. The account
//! store holds monolithic [`Account`] records before migration; the asset
//! store receives the extracted [`AccountAssetIssue`] records.

use std::sync::Arc;

use asset_migration_types::{Account, AccountAssetIssue, Address, decode, encode};
use snafu::ResultExt;

use crate::{
    error::{CodecSnafu, KvSnafu, Result},
    genesis::NamedAddressTable,
    kv::KvStore,
};

/// Name of the designated zero-balance sink account in genesis configuration.
pub const BALANCE_SINK_ACCOUNT: &str = "Blackhole";

/// Typed store over monolithic account records.
pub struct AccountStore<S> {
    inner: Arc<S>,
}

impl<S: KvStore> AccountStore<S> {
    /// Creates an account store over a key-value backend.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// Returns the decoded account stored under `address`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Kv`](crate::StoreError::Kv) if the read fails,
    /// or [`StoreError::Codec`](crate::StoreError::Codec) if the stored
    /// bytes do not decode.
    pub fn get(&self, address: &Address) -> Result<Option<Account>> {
        match self.inner.get(address.as_bytes()).context(KvSnafu)? {
            Some(bytes) => Ok(Some(decode(&bytes).context(CodecSnafu)?)),
            None => Ok(None),
        }
    }

    /// Stores an account record under the given address, overwriting any
    /// existing record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`](crate::StoreError::Codec) if encoding
    /// fails, or [`StoreError::Kv`](crate::StoreError::Kv) if the write
    /// fails.
    pub fn put(&self, address: &Address, account: &Account) -> Result<()> {
        let bytes = encode(account).context(CodecSnafu)?;
        self.inner.put(address.as_bytes(), &bytes).context(KvSnafu)
    }

    /// Returns the underlying key-value store.
    pub fn raw(&self) -> &Arc<S> {
        &self.inner
    }
}

/// Typed store over extracted per-account asset records.
pub struct AccountAssetStore<S> {
    inner: Arc<S>,
}

impl<S: KvStore> AccountAssetStore<S> {
    /// Creates an asset store over a key-value backend.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// Returns the decoded asset record stored under `address`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Kv`](crate::StoreError::Kv) if the read fails,
    /// or [`StoreError::Codec`](crate::StoreError::Codec) if the stored
    /// bytes do not decode.
    pub fn get(&self, address: &Address) -> Result<Option<AccountAssetIssue>> {
        match self.inner.get(address.as_bytes()).context(KvSnafu)? {
            Some(bytes) => Ok(Some(decode(&bytes).context(CodecSnafu)?)),
            None => Ok(None),
        }
    }

    /// Stores an asset record under the given address.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`](crate::StoreError::Codec) if encoding
    /// fails, or [`StoreError::Kv`](crate::StoreError::Kv) if the write
    /// fails.
    pub fn put(&self, address: &Address, record: &AccountAssetIssue) -> Result<()> {
        let bytes = encode(record).context(CodecSnafu)?;
        self.inner.put(address.as_bytes(), &bytes).context(KvSnafu)
    }

    /// Returns the asset record of the well-known zero-balance sink account.
    ///
    /// Returns `None` if the genesis table has no sink entry or no record
    /// has been migrated for it yet.
    ///
    /// # Errors
    ///
    /// Same as [`AccountAssetStore::get`].
    pub fn balance_sink(&self, table: &NamedAddressTable) -> Result<Option<AccountAssetIssue>> {
        match table.get(BALANCE_SINK_ACCOUNT) {
            Some(address) => self.get(address),
            None => Ok(None),
        }
    }

    /// Returns the underlying key-value store.
    pub fn raw(&self) -> &Arc<S> {
        &self.inner
    }
}
