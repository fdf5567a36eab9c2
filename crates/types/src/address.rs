//! Ledger account addresses.
//!
//! Addresses are 21 raw bytes: a fixed `0x41` network prefix followed by a
//! 20-byte account hash. The textual form is base58check (double-SHA-256
//! checksum), which is how genesis configuration spells addresses.

use std::fmt;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu, ensure};

/// Raw address length in bytes (prefix + 20-byte hash).
pub const ADDRESS_LEN: usize = 21;

/// Network prefix byte carried by every address.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Errors returned when parsing an address.
#[derive(Debug, Snafu)]
pub enum AddressError {
    /// The base58check decode failed (bad alphabet or checksum mismatch).
    #[snafu(display("invalid base58check address: {source}"))]
    Base58 {
        /// The underlying bs58 error.
        source: bs58::decode::Error,
    },

    /// The decoded payload has the wrong length.
    #[snafu(display("invalid address length: {actual} (expected {ADDRESS_LEN})"))]
    Length {
        /// Decoded payload length.
        actual: usize,
    },

    /// The decoded payload does not start with the network prefix.
    #[snafu(display("invalid address prefix: {byte:#04x} (expected {ADDRESS_PREFIX:#04x})"))]
    Prefix {
        /// The first payload byte.
        byte: u8,
    },
}

/// A ledger account address.
///
/// Used as the primary key in both the account store and the account asset
/// store. Compares and hashes by raw bytes; displays as base58check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Vec<u8>);

impl Address {
    /// Creates an address from raw bytes, validating length and prefix.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Length`] or [`AddressError::Prefix`] if the
    /// bytes are not a well-formed address.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, AddressError> {
        ensure!(bytes.len() == ADDRESS_LEN, LengthSnafu { actual: bytes.len() });
        ensure!(bytes[0] == ADDRESS_PREFIX, PrefixSnafu { byte: bytes[0] });
        Ok(Self(bytes))
    }

    /// Decodes an address from its base58check textual form.
    ///
    /// The checksum is verified during decode; the returned payload keeps
    /// the network prefix byte.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Base58`] on a malformed string or checksum
    /// mismatch, and the same validation errors as [`Address::from_bytes`].
    pub fn from_base58check(text: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(text).with_check(None).into_vec().context(Base58Snafu)?;
        Self::from_bytes(bytes)
    }

    /// Encodes the address to its base58check textual form.
    pub fn to_base58check(&self) -> String {
        bs58::encode(&self.0).with_check().into_string()
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58check())
    }
}
