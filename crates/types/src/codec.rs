//! Record serialization.
//!
//! Accounts and asset records are stored as postcard bytes. All encode and
//! decode paths go through this module so error handling stays uniform.

use serde::{Serialize, de::DeserializeOwned};
use snafu::Snafu;

/// Error type for codec operations.
#[derive(Debug, Snafu)]
pub enum CodecError {
    /// Encoding a record failed.
    #[snafu(display("record encoding failed: {source}"))]
    Encode {
        /// The underlying postcard error.
        source: postcard::Error,
    },

    /// Decoding raw bytes into a record failed.
    #[snafu(display("record decoding failed: {source}"))]
    Decode {
        /// The underlying postcard error.
        source: postcard::Error,
    },
}

/// Encodes a record to bytes.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    postcard::to_allocvec(value).map_err(|source| CodecError::Encode { source })
}

/// Decodes raw bytes into a record.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the bytes do not form a valid record.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    postcard::from_bytes(bytes).map_err(|source| CodecError::Decode { source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::account::Account;

    #[test]
    fn test_account_roundtrip() {
        let account = Account {
            name: "genesis".to_string(),
            balance: 42,
            asset_v2: BTreeMap::from([("1000001".to_string(), 9)]),
            ..Account::default()
        };

        let bytes = encode(&account).unwrap();
        let decoded: Account = decode(&bytes).unwrap();
        assert_eq!(account, decoded);
    }

    #[test]
    fn test_decode_garbage_fails() {
        // 0xFF runs are not a valid postcard Account.
        let result: Result<Account, _> = decode(&[0xFF; 64]);
        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }
}
