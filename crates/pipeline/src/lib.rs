//! One-time concurrent migration of asset fields out of account records.
//!
//! The pipeline moves the asset-related field groups embedded in monolithic
//! account records into a dedicated per-account asset store, leaving the
//! source records stripped. One scanning producer feeds a bounded work
//! queue; a fixed pool of workers performs the decode and dual write; a
//! progress monitor reports elapsed time; the coordinator supervises the
//! run behind a persisted idempotency flag.
//!
//! Data flows one direction:
//!
//! ```text
//! scanner -> work queue -> worker pool -> (asset store, account store)
//! ```
//!
//! Workers exit once the queue is closed and drained, and the idempotency
//! flag is persisted only after that drain barrier, so a completed run
//! means every scanned record was converted. The crash window between the
//! two writes of a single item is covered by [`reconcile`].

pub mod coordinator;
pub mod error;
pub mod monitor;
pub mod queue;
pub mod reconcile;
pub mod scanner;
pub mod worker;

pub use coordinator::{AssetMigration, MigrationReport};
pub use error::{ConvertItemError, MigrationError, Result};
pub use monitor::{ProgressHandle, ProgressMonitor};
pub use queue::{WorkItem, WorkReceiver, WorkSender, bounded};
pub use reconcile::{ReconcileReport, reconcile};
pub use scanner::{RecordScanner, ScanOutcome, ScannerHandle};
pub use worker::{ConvertWorkerPool, PoolHandle, PoolStats, convert_item};
