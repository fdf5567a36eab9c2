//! Error types for the migration pipeline.

use asset_migration_store::{KvError, StoreError};
use asset_migration_types::{AddressError, CodecError, ConfigError};
use snafu::Snafu;

/// Errors raised while converting a single work item.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConvertItemError {
    /// The raw bytes did not decode into an account record.
    #[snafu(display("account record failed to decode: {source}"))]
    Decode {
        /// The underlying codec error.
        source: CodecError,
    },

    /// Neither the record nor the store key carried a usable address.
    #[snafu(display("work item has no valid address: {source}"))]
    ItemAddress {
        /// The underlying address error.
        source: AddressError,
    },

    /// A store write failed while moving the record.
    #[snafu(display("store write failed during conversion: {source}"))]
    Write {
        /// The underlying store error.
        source: StoreError,
        /// Source code location for debugging.
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

impl ConvertItemError {
    /// Returns `true` for per-item data faults that the pool isolates
    /// (counts and skips) unless strict decoding is enabled.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::ItemAddress { .. })
    }
}

/// Errors returned by the migration coordinator and its components.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MigrationError {
    /// The migration configuration is invalid.
    #[snafu(display("migration config rejected: {source}"))]
    Config {
        /// The underlying validation error.
        source: ConfigError,
    },

    /// A properties store operation failed.
    #[snafu(display("idempotency flag access failed: {source}"))]
    Flag {
        /// The underlying store error.
        source: StoreError,
        /// Source code location for debugging.
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// Scanning the source store failed.
    #[snafu(display("source store scan failed: {source}"))]
    Scan {
        /// The underlying store error.
        source: KvError,
        /// Source code location for debugging.
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// A store operation failed during the reconciliation pass.
    #[snafu(display("reconciliation failed: {source}"))]
    Reconcile {
        /// The underlying store error.
        source: StoreError,
        /// Source code location for debugging.
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// A worker aborted while converting an item.
    #[snafu(display("record conversion aborted: {source}"))]
    Convert {
        /// The underlying conversion error.
        source: ConvertItemError,
    },

    /// The scanner thread panicked.
    #[snafu(display("scanner thread panicked"))]
    ScannerPanicked,

    /// A worker thread panicked.
    #[snafu(display("worker thread panicked"))]
    WorkerPanicked,

    /// The scan stopped before covering the full key space, so the run
    /// cannot be marked complete.
    #[snafu(display("scan ended early after {scanned} records; migration not marked complete"))]
    ScanIncomplete {
        /// Number of records pushed before the scan stopped.
        scanned: u64,
    },
}

/// Result type for pipeline operations.
pub type Result<T, E = MigrationError> = std::result::Result<T, E>;
