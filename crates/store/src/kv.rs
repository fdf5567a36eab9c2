//! Key-value store interface.
//!
//! The migration consumes its stores through this trait only: point reads,
//! point writes, and a lazy scan of the full key space. The
//! surrounding ledger framework supplies the production implementation;
//! [`InMemoryStore`](crate::InMemoryStore) backs tests.

use snafu::Snafu;

/// Errors surfaced by a key-value store backend.
#[derive(Debug, Snafu)]
pub enum KvError {
    /// An I/O operation against the underlying storage failed.
    #[snafu(display("store I/O failed: {source}"))]
    Io {
        /// The underlying I/O error.
        source: std::io::Error,
        /// Source code location for debugging.
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// The backend observed corrupted or inconsistent data.
    #[snafu(display("store corrupted: {reason}"))]
    Corrupted {
        /// Description of the corruption.
        reason: String,
    },
}

/// Result type for key-value store operations.
pub type Result<T, E = KvError> = std::result::Result<T, E>;

/// Lazy iterator over the pairs yielded by a [`KvStore::scan`].
pub type ScanIter<'a> = Box<dyn Iterator<Item = Result<(Vec<u8>, Vec<u8>)>> + 'a>;

/// A key-value store holding raw record bytes.
///
/// Implementations must be independently synchronized: concurrent point
/// writes to distinct keys never conflict, and [`scan`](KvStore::scan) is
/// safe to consume while later point writes land (snapshot semantics).
pub trait KvStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the backend read fails.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the backend write fails.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Iterates the full key space.
    ///
    /// Every pair present at call time is yielded exactly once, and writes
    /// issued after the call do not appear. The iterator is lazy: backends
    /// with snapshot iterators stream pairs one at a time, so consuming it
    /// slowly holds only the backend's own iterator state in memory.
    /// [`InMemoryStore`](crate::InMemoryStore) copies its map under the
    /// lock instead, which is fine for a test backend.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if starting the scan fails; per-pair errors are
    /// yielded through the iterator.
    fn scan(&self) -> Result<ScanIter<'_>>;
}
