//! Core types for the account asset migration.
//!
//! This crate provides the foundational pieces shared by the store and
//! pipeline layers:
//! - [`Address`] and its base58check textual encoding
//! - [`Account`] (source record) and [`AccountAssetIssue`] (destination record)
//! - postcard-backed record codec
//! - [`MigrationConfig`] with validation
//! - Error types using snafu

pub mod account;
pub mod address;
pub mod codec;
pub mod config;

// Re-export commonly used types at crate root
pub use account::{Account, AccountAssetIssue};
pub use address::{ADDRESS_LEN, ADDRESS_PREFIX, Address, AddressError};
pub use codec::{CodecError, decode, encode};
pub use config::{ConfigError, MigrationConfig};
