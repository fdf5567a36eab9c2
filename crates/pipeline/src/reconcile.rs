//! Reconciliation pass for the dual-write crash window.
//!
//! The per-item move is two independent point writes: destination record
//! first, stripped source record second. A crash between them leaves an
//! address with both the new asset record and the original un-stripped
//! account. This pass finds such addresses and re-strips the source
//! record. It is idempotent and safe to run any time after a crash.

use asset_migration_store::{AccountAssetStore, AccountStore, KvStore};
use asset_migration_types::Address;
use snafu::ResultExt;
use tracing::{info, warn};

use crate::error::{ReconcileSnafu, Result, ScanSnafu};

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Destination records examined.
    pub checked: u64,
    /// Source records that still carried asset fields and were re-stripped.
    pub repaired: u64,
    /// Destination records whose source counterpart was already clean.
    pub clean: u64,
}

/// Re-strips source records left behind by a partial dual write.
///
/// Scans the destination store; for every address holding an asset record
/// whose source account still carries asset fields, clears those fields and
/// rewrites the source record. Destination keys without a decodable address
/// or source account are logged and left alone.
///
/// # Errors
///
/// Returns [`MigrationError::Scan`](crate::MigrationError::Scan) if the
/// destination scan fails and
/// [`MigrationError::Reconcile`](crate::MigrationError::Reconcile) if a
/// source read or rewrite fails.
pub fn reconcile<S, D>(
    accounts: &AccountStore<S>,
    assets: &AccountAssetStore<D>,
) -> Result<ReconcileReport>
where
    S: KvStore,
    D: KvStore,
{
    let mut report = ReconcileReport::default();

    for pair in assets.raw().scan().context(ScanSnafu)? {
        let (key, _) = pair.context(ScanSnafu)?;
        report.checked += 1;

        let Ok(address) = Address::from_bytes(key.clone()) else {
            warn!(key = ?key, "skipping destination record with malformed address key");
            continue;
        };

        let Some(mut account) = accounts.get(&address).context(ReconcileSnafu)? else {
            warn!(address = %address, "destination record has no source account");
            continue;
        };

        if account.has_asset_fields() {
            account.clear_asset_fields();
            accounts.put(&address, &account).context(ReconcileSnafu)?;
            report.repaired += 1;
        } else {
            report.clean += 1;
        }
    }

    info!(
        checked = report.checked,
        repaired = report.repaired,
        clean = report.clean,
        "reconciliation pass complete"
    );
    Ok(report)
}
