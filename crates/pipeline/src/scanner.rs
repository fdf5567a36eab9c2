//! Record scanner: the pipeline's single producer.
//!
//! Walks the source store's key space on a dedicated thread, pulling one
//! pair at a time and pushing it into the work queue, blocking while the
//! queue is full. When the scan finishes the sender is dropped, which
//! closes the queue. That close is the pipeline's completion signal:
//! workers drain what remains and exit on their own.

use std::{sync::Arc, thread};

use asset_migration_store::KvStore;
use snafu::ResultExt;
use tracing::{info, warn};

use crate::{
    error::{MigrationError, Result, ScanSnafu},
    queue::{WorkItem, WorkSender},
};

/// Outcome of one scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Number of records pushed into the queue.
    pub scanned: u64,
    /// `true` if the full key space was covered. A scan ends early only
    /// when the queue closes underneath it (all consumers gone).
    pub complete: bool,
}

/// Handle to the scanner thread.
pub struct ScannerHandle {
    thread: thread::JoinHandle<Result<ScanOutcome>>,
}

impl ScannerHandle {
    /// Waits for the scan to finish and returns its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Scan`] if the source scan fails and
    /// [`MigrationError::ScannerPanicked`] if the thread panicked.
    pub fn join(self) -> Result<ScanOutcome> {
        self.thread.join().map_err(|_| MigrationError::ScannerPanicked)?
    }
}

/// The scanning producer.
pub struct RecordScanner;

impl RecordScanner {
    /// Starts scanning `source` on a dedicated thread, pushing every
    /// `(key, value)` pair into the queue.
    ///
    /// The sender is consumed; dropping it at the end of the scan closes
    /// the queue.
    pub fn spawn<S: KvStore + 'static>(source: Arc<S>, tx: WorkSender) -> ScannerHandle {
        let thread = thread::spawn(move || Self::scan(source.as_ref(), &tx));
        ScannerHandle { thread }
    }

    fn scan<S: KvStore>(source: &S, tx: &WorkSender) -> Result<ScanOutcome> {
        let mut scanned = 0u64;
        // The iterator is pulled one pair at a time, so a full queue blocks
        // the push and the backend holds no more than its own iterator
        // state; the queue capacity is the memory bound for records in
        // flight.
        for pair in source.scan().context(ScanSnafu)? {
            let (key, value) = pair.context(ScanSnafu)?;
            if tx.push(WorkItem { key, value }).is_err() {
                warn!(scanned, "work queue closed mid-scan; stopping early");
                return Ok(ScanOutcome { scanned, complete: false });
            }
            scanned += 1;
        }

        info!(scanned, "account store scan complete");
        Ok(ScanOutcome { scanned, complete: true })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    };

    use asset_migration_store::{InMemoryStore, KvError, ScanIter};

    use super::*;
    use crate::queue;

    fn seeded_store(records: u8) -> Arc<InMemoryStore> {
        let store = InMemoryStore::new();
        for n in 0..records {
            store.put(&[n], &[n, n]).unwrap();
        }
        Arc::new(store)
    }

    /// Wraps [`InMemoryStore`] to count how many pairs a scan has yielded.
    struct CountingStore {
        inner: InMemoryStore,
        yielded: Arc<AtomicU64>,
    }

    impl KvStore for CountingStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
            self.inner.get(key)
        }

        fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
            self.inner.put(key, value)
        }

        fn scan(&self) -> Result<ScanIter<'_>, KvError> {
            let yielded = Arc::clone(&self.yielded);
            Ok(Box::new(self.inner.scan()?.map(move |pair| {
                yielded.fetch_add(1, Ordering::SeqCst);
                pair
            })))
        }
    }

    #[test]
    fn test_scan_pushes_every_pair_once_and_closes_queue() {
        let store = seeded_store(10);
        let (tx, rx) = queue::bounded(32);

        let handle = RecordScanner::spawn(store, tx);

        let mut keys = Vec::new();
        while let Some(item) = rx.pop() {
            keys.push(item.key);
        }

        let outcome = handle.join().unwrap();
        assert_eq!(outcome, ScanOutcome { scanned: 10, complete: true });
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn test_scan_of_empty_store_completes_immediately() {
        let (tx, rx) = queue::bounded(4);
        let handle = RecordScanner::spawn(Arc::new(InMemoryStore::new()), tx);

        assert!(rx.pop().is_none());
        let outcome = handle.join().unwrap();
        assert_eq!(outcome, ScanOutcome { scanned: 0, complete: true });
    }

    #[test]
    fn test_scan_blocks_on_full_queue_then_finishes_when_drained() {
        let store = seeded_store(20);
        let (tx, rx) = queue::bounded(2);

        let handle = RecordScanner::spawn(store, tx);

        let mut count = 0;
        while rx.pop().is_some() {
            count += 1;
        }
        assert_eq!(count, 20);
        assert!(handle.join().unwrap().complete);
    }

    #[test]
    fn test_scan_pulls_lazily_up_to_queue_capacity() {
        let yielded = Arc::new(AtomicU64::new(0));
        let store = CountingStore { inner: InMemoryStore::new(), yielded: Arc::clone(&yielded) };
        for n in 0..20u8 {
            store.put(&[n], &[n, n]).unwrap();
        }

        let (tx, rx) = queue::bounded(2);
        let handle = RecordScanner::spawn(Arc::new(store), tx);

        // With no consumer the scanner fills the queue and blocks on the
        // next push, so at most capacity plus one pair may have been
        // pulled from the backend.
        thread::sleep(Duration::from_millis(100));
        assert!(yielded.load(Ordering::SeqCst) <= 3);

        let mut count = 0;
        while rx.pop().is_some() {
            count += 1;
        }
        assert_eq!(count, 20);
        assert_eq!(yielded.load(Ordering::SeqCst), 20);
        assert!(handle.join().unwrap().complete);
    }

    #[test]
    fn test_scan_stops_early_when_queue_closes() {
        let store = seeded_store(20);
        let (tx, rx) = queue::bounded(2);

        let handle = RecordScanner::spawn(store, tx);
        // Consume a couple of items, then abandon the queue.
        let _ = rx.pop();
        let _ = rx.pop();
        drop(rx);

        let outcome = handle.join().unwrap();
        assert!(!outcome.complete);
        assert!(outcome.scanned < 20);
    }
}
