//! Error types for the typed store layer.

use asset_migration_types::CodecError;
use snafu::Snafu;

use crate::kv::KvError;

/// Errors returned by the typed store wrappers.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    /// Underlying key-value store operation failed.
    #[snafu(display("storage error: {source}"))]
    Kv {
        /// The underlying store error.
        source: KvError,
        /// Source code location for debugging.
        #[snafu(implicit)]
        location: snafu::Location,
    },

    /// Serialization or deserialization of a record failed.
    #[snafu(display("codec error: {source}"))]
    Codec {
        /// The underlying codec error.
        source: CodecError,
        /// Source code location for debugging.
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

/// Result type for typed store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
