//! Genesis named-address table.
//!
//! Genesis configuration lists well-known accounts as `{name, address}`
//! pairs with base58check-encoded addresses. The table is built explicitly
//! during initialization and passed by reference to whoever needs lookups;
//! there is no ambient global.

use std::collections::HashMap;

use asset_migration_types::{Address, AddressError};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

/// One genesis asset account entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAsset {
    /// Human-readable account name.
    pub account_name: String,
    /// Base58check-encoded account address.
    pub address: String,
}

/// Errors returned while building the named-address table.
#[derive(Debug, Snafu)]
pub enum GenesisError {
    /// A genesis entry carries an address that fails to decode.
    #[snafu(display("genesis account {name:?} has an invalid address: {source}"))]
    InvalidAddress {
        /// The offending account name.
        name: String,
        /// The underlying address error.
        source: AddressError,
    },
}

/// Read-only mapping from well-known account names to ledger addresses.
#[derive(Debug, Clone, Default)]
pub struct NamedAddressTable {
    entries: HashMap<String, Address>,
}

impl NamedAddressTable {
    /// Builds the table from genesis asset entries.
    ///
    /// A later entry with the same name overrides an earlier one, matching
    /// plain map insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GenesisError::InvalidAddress`] if any entry's address is
    /// not valid base58check; construction fails rather than skipping the
    /// entry silently.
    pub fn from_genesis(assets: &[GenesisAsset]) -> Result<Self, GenesisError> {
        let mut entries = HashMap::with_capacity(assets.len());
        for asset in assets {
            let address = Address::from_base58check(&asset.address)
                .context(InvalidAddressSnafu { name: asset.account_name.clone() })?;
            entries.insert(asset.account_name.clone(), address);
        }
        Ok(Self { entries })
    }

    /// Looks up an address by account name.
    pub fn get(&self, name: &str) -> Option<&Address> {
        self.entries.get(name)
    }

    /// Returns the number of named accounts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use asset_migration_types::{ADDRESS_LEN, ADDRESS_PREFIX};

    use super::*;

    fn test_address(fill: u8) -> Address {
        let mut bytes = vec![fill; ADDRESS_LEN];
        bytes[0] = ADDRESS_PREFIX;
        Address::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_from_genesis_and_lookup() {
        let sink = test_address(0x01);
        let zion = test_address(0x02);
        let table = NamedAddressTable::from_genesis(&[
            GenesisAsset { account_name: "Blackhole".to_string(), address: sink.to_base58check() },
            GenesisAsset { account_name: "Zion".to_string(), address: zion.to_base58check() },
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Blackhole"), Some(&sink));
        assert_eq!(table.get("Zion"), Some(&zion));
        assert_eq!(table.get("Unknown"), None);
    }

    #[test]
    fn test_invalid_address_fails_construction() {
        let err = NamedAddressTable::from_genesis(&[GenesisAsset {
            account_name: "Broken".to_string(),
            address: "not-base58check".to_string(),
        }])
        .unwrap_err();

        assert!(matches!(err, GenesisError::InvalidAddress { ref name, .. } if name == "Broken"));
    }

    #[test]
    fn test_entries_deserialize_from_config_json() {
        let json = format!(
            r#"[{{"account_name": "Blackhole", "address": "{}"}}]"#,
            test_address(0x03).to_base58check()
        );
        let assets: Vec<GenesisAsset> = serde_json::from_str(&json).unwrap();
        let table = NamedAddressTable::from_genesis(&assets).unwrap();
        assert_eq!(table.len(), 1);
    }
}
