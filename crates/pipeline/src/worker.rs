//! Conversion worker pool: the pipeline's consumers.
//!
//! Each worker loops over the shared work queue: decode the account record,
//! write the extracted asset record to the destination store, then write
//! the stripped account back to the source store. For every address the
//! destination write strictly precedes the source overwrite; the two writes
//! are independent point writes with no transaction boundary, and the
//! crash window between them is repaired by [`crate::reconcile`].
//!
//! Workers exit on their own once the queue is closed and drained. Decode
//! failures are isolated per item (logged, counted, skipped) unless
//! strict decoding is configured, in which case the run fails.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
};

use asset_migration_store::{AccountAssetStore, AccountStore, KvStore};
use asset_migration_types::{Account, Address, MigrationConfig, decode};
use snafu::ResultExt;
use tracing::{debug, error, warn};

use crate::{
    error::{
        ConvertItemError, DecodeSnafu, ItemAddressSnafu, MigrationError, Result, WriteSnafu,
    },
    queue::{WorkItem, WorkReceiver},
};

/// Running totals of a worker pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Items converted and dual-written successfully.
    pub converted: u64,
    /// Items skipped because their bytes did not decode.
    pub decode_failures: u64,
}

#[derive(Default)]
struct Counters {
    converted: AtomicU64,
    decode_failures: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> PoolStats {
        PoolStats {
            converted: self.converted.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

/// Handle to a running worker pool.
pub struct PoolHandle {
    workers: Vec<thread::JoinHandle<Result<()>>>,
    counters: Arc<Counters>,
}

impl PoolHandle {
    /// Returns a snapshot of the pool's running totals.
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot()
    }

    /// Waits for every worker to drain the queue and exit.
    ///
    /// This is the pipeline's drain barrier: once it returns, no further
    /// store writes will be issued by this pool.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::WorkerPanicked`] if a worker panicked, or
    /// the first conversion error a worker aborted with. All workers are
    /// joined before any error is reported.
    pub fn join(self) -> Result<PoolStats> {
        let mut first_error = None;
        for worker in self.workers {
            match worker.join() {
                Ok(Ok(())) => {},
                Ok(Err(err)) => {
                    first_error.get_or_insert(err);
                },
                Err(_) => {
                    first_error.get_or_insert(MigrationError::WorkerPanicked);
                },
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(self.counters.snapshot()),
        }
    }
}

/// The consuming worker pool.
pub struct ConvertWorkerPool;

impl ConvertWorkerPool {
    /// Spawns `config.max_workers` workers draining `rx`.
    ///
    /// Each worker holds its own receiver clone; the pool winds down once
    /// the queue closes and the remaining items are drained.
    pub fn spawn<S, D>(
        rx: WorkReceiver,
        accounts: Arc<AccountStore<S>>,
        assets: Arc<AccountAssetStore<D>>,
        config: &MigrationConfig,
    ) -> PoolHandle
    where
        S: KvStore + 'static,
        D: KvStore + 'static,
    {
        let counters = Arc::new(Counters::default());
        let strict = config.strict_decode;

        let workers = (0..config.max_workers)
            .map(|worker_id| {
                let rx = rx.clone();
                let accounts = Arc::clone(&accounts);
                let assets = Arc::clone(&assets);
                let counters = Arc::clone(&counters);
                thread::spawn(move || {
                    worker_loop(worker_id, &rx, &accounts, &assets, &counters, strict)
                })
            })
            .collect();

        PoolHandle { workers, counters }
    }
}

fn worker_loop<S, D>(
    worker_id: usize,
    rx: &WorkReceiver,
    accounts: &AccountStore<S>,
    assets: &AccountAssetStore<D>,
    counters: &Counters,
    strict: bool,
) -> Result<()>
where
    S: KvStore,
    D: KvStore,
{
    while let Some(item) = rx.pop() {
        match convert_item(&item, accounts, assets) {
            Ok(()) => {
                counters.converted.fetch_add(1, Ordering::Relaxed);
            },
            Err(err) if err.is_decode_failure() && !strict => {
                counters.decode_failures.fetch_add(1, Ordering::Relaxed);
                warn!(worker_id, key = ?item.key, error = %err, "skipping undecodable account record");
            },
            Err(err) => {
                error!(worker_id, key = ?item.key, error = %err, "worker aborting");
                return Err(MigrationError::Convert { source: err });
            },
        }
    }

    debug!(worker_id, "work queue drained; worker exiting");
    Ok(())
}

/// Converts a single work item: destination write, then source overwrite.
///
/// The address comes from the decoded record when present, falling back to
/// the store key.
///
/// # Errors
///
/// Returns [`ConvertItemError::Decode`] or [`ConvertItemError::ItemAddress`]
/// if the item's bytes are unusable, and [`ConvertItemError::Write`] if
/// either store write fails.
pub fn convert_item<S, D>(
    item: &WorkItem,
    accounts: &AccountStore<S>,
    assets: &AccountAssetStore<D>,
) -> Result<(), ConvertItemError>
where
    S: KvStore,
    D: KvStore,
{
    let mut account: Account = decode(&item.value).context(DecodeSnafu)?;
    let address = match account.address.clone() {
        Some(address) => address,
        None => Address::from_bytes(item.key.clone()).context(ItemAddressSnafu)?,
    };

    // Destination first: a crash here leaves the source untouched, which
    // reconciliation can repair; the reverse order could lose the fields.
    let asset_issue = account.extract_asset_issue();
    assets.put(&address, &asset_issue).context(WriteSnafu)?;

    account.clear_asset_fields();
    accounts.put(&address, &account).context(WriteSnafu)?;
    Ok(())
}
