//! Migration coordinator.
//!
//! Orchestrates one run of the account asset migration: checks the
//! idempotency flag, wires up queue, scanner, worker pool, and progress
//! monitor, waits for the whole pipeline to drain, and only then persists
//! the flag. The flag is written after the drain barrier, not after the
//! scan alone, so a completed run guarantees every scanned record was
//! converted.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use asset_migration_store::{AccountAssetStore, AccountStore, KvStore, PropertiesStore};
use asset_migration_types::MigrationConfig;
use snafu::ResultExt;
use tracing::{error, info};

use crate::{
    error::{ConfigSnafu, FlagSnafu, MigrationError, Result},
    monitor::ProgressMonitor,
    queue,
    scanner::{RecordScanner, ScannerHandle},
    worker::{ConvertWorkerPool, PoolHandle},
};

/// Summary of one coordinator invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records pushed by the scanner.
    pub scanned: u64,
    /// Records converted and dual-written.
    pub converted: u64,
    /// Records skipped because they failed to decode.
    pub decode_failures: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// `true` if the idempotency flag was already set and nothing ran.
    pub already_done: bool,
}

impl MigrationReport {
    fn already_done() -> Self {
        Self { already_done: true, ..Self::default() }
    }
}

/// The one-time account asset migration.
///
/// Construct with the builder, then call [`run`](AssetMigration::run). The
/// run is idempotent at the flag level: once a run has completed, further
/// invocations are no-ops that create no queue, threads, or writes.
#[derive(bon::Builder)]
pub struct AssetMigration<S, D, P>
where
    S: KvStore + 'static,
    D: KvStore + 'static,
    P: KvStore + 'static,
{
    /// Source store of monolithic account records.
    accounts: Arc<AccountStore<S>>,
    /// Destination store of extracted asset records.
    assets: Arc<AccountAssetStore<D>>,
    /// Properties store holding the idempotency flag.
    properties: Arc<PropertiesStore<P>>,
    /// Pipeline configuration.
    #[builder(default)]
    config: MigrationConfig,
}

impl<S, D, P> AssetMigration<S, D, P>
where
    S: KvStore + 'static,
    D: KvStore + 'static,
    P: KvStore + 'static,
{
    /// Runs the migration once.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError`] if the config is invalid, the flag cannot
    /// be read or written, the scan fails or ends early, or a worker aborts.
    /// On any failure the flag is left at 0, so a later invocation retries
    /// the whole run.
    pub fn run(&self) -> Result<MigrationReport> {
        self.config.validate().context(ConfigSnafu)?;

        if self.properties.asset_import_done().context(FlagSnafu)? != 0 {
            info!("account asset import already completed; skipping");
            return Ok(MigrationReport::already_done());
        }

        info!("importing assets from account store to account asset store");
        let started = Instant::now();

        let (tx, rx) = queue::bounded(self.config.queue_capacity);
        let monitor =
            ProgressMonitor::start(self.config.progress_interval, self.config.progress_log_every);
        let scanner = RecordScanner::spawn(Arc::clone(self.accounts.raw()), tx);
        let pool = ConvertWorkerPool::spawn(
            rx,
            Arc::clone(&self.accounts),
            Arc::clone(&self.assets),
            &self.config,
        );

        let result = self.wait_for_completion(scanner, pool, started);
        // Cleanup runs on success and failure alike.
        monitor.cancel();

        match &result {
            Ok(report) => info!(
                scanned = report.scanned,
                converted = report.converted,
                decode_failures = report.decode_failures,
                elapsed_secs = report.elapsed.as_secs(),
                "account asset import finished"
            ),
            Err(err) => error!(error = %err, "account asset import failed"),
        }
        result
    }

    /// Joins scanner and pool, then persists the idempotency flag.
    ///
    /// Both joins happen unconditionally so no thread is left dangling;
    /// worker errors take precedence over scanner errors because an early
    /// queue close is usually the consequence of a worker abort.
    fn wait_for_completion(
        &self,
        scanner: ScannerHandle,
        pool: PoolHandle,
        started: Instant,
    ) -> Result<MigrationReport> {
        let scan_result = scanner.join();
        let pool_result = pool.join();

        let stats = pool_result?;
        let outcome = scan_result?;
        if !outcome.complete {
            return Err(MigrationError::ScanIncomplete { scanned: outcome.scanned });
        }

        self.properties.set_asset_import_done(1).context(FlagSnafu)?;

        Ok(MigrationReport {
            scanned: outcome.scanned,
            converted: stats.converted,
            decode_failures: stats.decode_failures,
            elapsed: started.elapsed(),
            already_done: false,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use asset_migration_store::InMemoryStore;
    use asset_migration_types::{ADDRESS_LEN, ADDRESS_PREFIX, Account, Address};

    use super::*;

    fn test_address(fill: u8) -> Address {
        let mut bytes = vec![fill; ADDRESS_LEN];
        bytes[0] = ADDRESS_PREFIX;
        Address::from_bytes(bytes).unwrap()
    }

    fn migration() -> AssetMigration<InMemoryStore, InMemoryStore, InMemoryStore> {
        AssetMigration::builder()
            .accounts(Arc::new(AccountStore::new(Arc::new(InMemoryStore::new()))))
            .assets(Arc::new(AccountAssetStore::new(Arc::new(InMemoryStore::new()))))
            .properties(Arc::new(PropertiesStore::new(Arc::new(InMemoryStore::new()))))
            .build()
    }

    #[test]
    fn test_empty_store_run_completes_and_sets_flag() {
        let migration = migration();
        let report = migration.run().unwrap();

        assert!(!report.already_done);
        assert_eq!(report.scanned, 0);
        assert_eq!(report.converted, 0);
        assert_eq!(migration.properties.asset_import_done().unwrap(), 1);
    }

    #[test]
    fn test_flag_already_set_is_a_noop() {
        let migration = migration();
        let account =
            Account { address: Some(test_address(0x01)), balance: 1, ..Account::default() };
        migration.accounts.put(&test_address(0x01), &account).unwrap();
        migration.properties.set_asset_import_done(1).unwrap();

        let report = migration.run().unwrap();

        assert!(report.already_done);
        assert_eq!(report.scanned, 0);
        assert!(migration.assets.raw().is_empty());
        // Source record untouched.
        assert_eq!(migration.accounts.get(&test_address(0x01)).unwrap(), Some(account));
    }

    #[test]
    fn test_invalid_config_rejected_before_any_work() {
        let migration = AssetMigration::builder()
            .accounts(Arc::new(AccountStore::new(Arc::new(InMemoryStore::new()))))
            .assets(Arc::new(AccountAssetStore::new(Arc::new(InMemoryStore::new()))))
            .properties(Arc::new(PropertiesStore::new(Arc::new(InMemoryStore::new()))))
            .config(MigrationConfig::builder().queue_capacity(0).build())
            .build();

        assert!(matches!(migration.run(), Err(MigrationError::Config { .. })));
        assert_eq!(migration.properties.asset_import_done().unwrap(), 0);
    }
}
