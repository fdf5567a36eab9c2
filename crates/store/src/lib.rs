//! Store layer for the account asset migration.
//!
//! The migration never touches a storage engine directly. It consumes the
//! [`KvStore`] trait (point get/put plus a lazy snapshot scan) and the typed
//! wrappers built on top of it:
//!
//! - [`AccountStore`]: monolithic account records (migration source)
//! - [`AccountAssetStore`]: extracted per-account asset records (destination)
//! - [`PropertiesStore`]: durable process-wide flags, including the
//!   asset-import idempotency flag
//! - [`NamedAddressTable`]: genesis name-to-address lookups
//!
//! [`InMemoryStore`] backs the test suites.

pub mod accounts;
pub mod error;
pub mod genesis;
pub mod kv;
pub mod memory;
pub mod properties;

pub use accounts::{AccountAssetStore, AccountStore, BALANCE_SINK_ACCOUNT};
pub use error::{Result, StoreError};
pub use genesis::{GenesisAsset, GenesisError, NamedAddressTable};
pub use kv::{KvError, KvStore, ScanIter};
pub use memory::InMemoryStore;
pub use properties::PropertiesStore;
