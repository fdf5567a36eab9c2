//! Account and account-asset records.
//!
//! [`Account`] is the monolithic source record: general account state plus
//! six asset-related field groups. [`AccountAssetIssue`] is the dedicated
//! destination record holding exactly those six groups. The migration moves
//! the groups from one to the other; values are copied verbatim, never
//! renamed or recomputed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// A monolithic account record as stored in the account store.
///
/// The `asset` / `free_asset_net_usage` / `latest_asset_operation_time`
/// maps are keyed by asset name (legacy encoding); their `_v2` twins are
/// keyed by asset id (current encoding).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account address; primary key in the account store.
    pub address: Option<Address>,
    /// Human-readable account name, empty for ordinary accounts.
    #[serde(default)]
    pub name: String,
    /// Native currency balance.
    #[serde(default)]
    pub balance: i64,
    /// Identifier of the asset issued by this account, empty if none.
    #[serde(default)]
    pub asset_issued_id: Vec<u8>,
    /// Name of the asset issued by this account, empty if none.
    #[serde(default)]
    pub asset_issued_name: Vec<u8>,
    /// Asset balances, legacy encoding (keyed by asset name).
    #[serde(default)]
    pub asset: BTreeMap<String, i64>,
    /// Asset balances, current encoding (keyed by asset id).
    #[serde(default)]
    pub asset_v2: BTreeMap<String, i64>,
    /// Free bandwidth consumed per asset, legacy encoding.
    #[serde(default)]
    pub free_asset_net_usage: BTreeMap<String, i64>,
    /// Free bandwidth consumed per asset, current encoding.
    #[serde(default)]
    pub free_asset_net_usage_v2: BTreeMap<String, i64>,
    /// Timestamp of the latest operation per asset, legacy encoding.
    #[serde(default)]
    pub latest_asset_operation_time: BTreeMap<String, i64>,
    /// Timestamp of the latest operation per asset, current encoding.
    #[serde(default)]
    pub latest_asset_operation_time_v2: BTreeMap<String, i64>,
}

impl Account {
    /// Builds the destination record from this account's asset field groups.
    ///
    /// Every field value is copied verbatim; an account without assets yields
    /// a record whose groups are all default.
    pub fn extract_asset_issue(&self) -> AccountAssetIssue {
        AccountAssetIssue {
            address: self.address.clone(),
            asset_issued_id: self.asset_issued_id.clone(),
            asset_issued_name: self.asset_issued_name.clone(),
            asset: self.asset.clone(),
            asset_v2: self.asset_v2.clone(),
            free_asset_net_usage: self.free_asset_net_usage.clone(),
            free_asset_net_usage_v2: self.free_asset_net_usage_v2.clone(),
            latest_asset_operation_time: self.latest_asset_operation_time.clone(),
            latest_asset_operation_time_v2: self.latest_asset_operation_time_v2.clone(),
        }
    }

    /// Resets all six asset field groups to their defaults.
    pub fn clear_asset_fields(&mut self) {
        self.asset_issued_id.clear();
        self.asset_issued_name.clear();
        self.asset.clear();
        self.asset_v2.clear();
        self.free_asset_net_usage.clear();
        self.free_asset_net_usage_v2.clear();
        self.latest_asset_operation_time.clear();
        self.latest_asset_operation_time_v2.clear();
    }

    /// Returns `true` if any asset field group is non-default.
    pub fn has_asset_fields(&self) -> bool {
        !self.asset_issued_id.is_empty()
            || !self.asset_issued_name.is_empty()
            || !self.asset.is_empty()
            || !self.asset_v2.is_empty()
            || !self.free_asset_net_usage.is_empty()
            || !self.free_asset_net_usage_v2.is_empty()
            || !self.latest_asset_operation_time.is_empty()
            || !self.latest_asset_operation_time_v2.is_empty()
    }

    /// Sums the balances of both asset maps.
    pub fn total_asset_balance(&self) -> i64 {
        total_balance(&self.asset, &self.asset_v2)
    }
}

/// The dedicated per-account asset record stored in the asset store.
///
/// Created once per address by the migration and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssetIssue {
    /// Account address; primary key in the asset store.
    pub address: Option<Address>,
    /// Identifier of the asset issued by this account.
    #[serde(default)]
    pub asset_issued_id: Vec<u8>,
    /// Name of the asset issued by this account.
    #[serde(default)]
    pub asset_issued_name: Vec<u8>,
    /// Asset balances, legacy encoding.
    #[serde(default)]
    pub asset: BTreeMap<String, i64>,
    /// Asset balances, current encoding.
    #[serde(default)]
    pub asset_v2: BTreeMap<String, i64>,
    /// Free bandwidth consumed per asset, legacy encoding.
    #[serde(default)]
    pub free_asset_net_usage: BTreeMap<String, i64>,
    /// Free bandwidth consumed per asset, current encoding.
    #[serde(default)]
    pub free_asset_net_usage_v2: BTreeMap<String, i64>,
    /// Timestamp of the latest operation per asset, legacy encoding.
    #[serde(default)]
    pub latest_asset_operation_time: BTreeMap<String, i64>,
    /// Timestamp of the latest operation per asset, current encoding.
    #[serde(default)]
    pub latest_asset_operation_time_v2: BTreeMap<String, i64>,
}

impl AccountAssetIssue {
    /// Sums the balances of both asset maps.
    pub fn total_asset_balance(&self) -> i64 {
        total_balance(&self.asset, &self.asset_v2)
    }
}

fn total_balance(asset: &BTreeMap<String, i64>, asset_v2: &BTreeMap<String, i64>) -> i64 {
    asset.values().sum::<i64>() + asset_v2.values().sum::<i64>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::address::{ADDRESS_LEN, ADDRESS_PREFIX};

    fn test_address(fill: u8) -> Address {
        let mut bytes = vec![fill; ADDRESS_LEN];
        bytes[0] = ADDRESS_PREFIX;
        Address::from_bytes(bytes).unwrap()
    }

    fn account_with_assets() -> Account {
        Account {
            address: Some(test_address(0x01)),
            name: "issuer".to_string(),
            balance: 5_000,
            asset_issued_id: b"1000001".to_vec(),
            asset_issued_name: b"token".to_vec(),
            asset: BTreeMap::from([("token".to_string(), 300)]),
            asset_v2: BTreeMap::from([("1000001".to_string(), 700)]),
            free_asset_net_usage: BTreeMap::from([("token".to_string(), 12)]),
            free_asset_net_usage_v2: BTreeMap::from([("1000001".to_string(), 34)]),
            latest_asset_operation_time: BTreeMap::from([("token".to_string(), 1_600)]),
            latest_asset_operation_time_v2: BTreeMap::from([("1000001".to_string(), 1_700)]),
        }
    }

    #[test]
    fn test_extract_copies_fields_verbatim() {
        let account = account_with_assets();
        let asset_issue = account.extract_asset_issue();

        assert_eq!(asset_issue.address, account.address);
        assert_eq!(asset_issue.asset_issued_id, account.asset_issued_id);
        assert_eq!(asset_issue.asset_issued_name, account.asset_issued_name);
        assert_eq!(asset_issue.asset, account.asset);
        assert_eq!(asset_issue.asset_v2, account.asset_v2);
        assert_eq!(asset_issue.free_asset_net_usage, account.free_asset_net_usage);
        assert_eq!(asset_issue.free_asset_net_usage_v2, account.free_asset_net_usage_v2);
        assert_eq!(asset_issue.latest_asset_operation_time, account.latest_asset_operation_time);
        assert_eq!(
            asset_issue.latest_asset_operation_time_v2,
            account.latest_asset_operation_time_v2
        );
    }

    #[test]
    fn test_clear_resets_all_six_groups() {
        let mut account = account_with_assets();
        account.clear_asset_fields();

        assert!(!account.has_asset_fields());
        assert!(account.asset_issued_id.is_empty());
        assert!(account.asset_issued_name.is_empty());
        assert!(account.asset.is_empty());
        assert!(account.asset_v2.is_empty());
        assert!(account.free_asset_net_usage.is_empty());
        assert!(account.free_asset_net_usage_v2.is_empty());
        assert!(account.latest_asset_operation_time.is_empty());
        assert!(account.latest_asset_operation_time_v2.is_empty());
    }

    #[test]
    fn test_clear_preserves_unrelated_fields() {
        let mut account = account_with_assets();
        account.clear_asset_fields();

        assert_eq!(account.name, "issuer");
        assert_eq!(account.balance, 5_000);
        assert_eq!(account.address, Some(test_address(0x01)));
    }

    #[test]
    fn test_has_asset_fields_on_default_account() {
        assert!(!Account::default().has_asset_fields());
    }

    #[test]
    fn test_total_asset_balance_sums_both_maps() {
        let account = account_with_assets();
        assert_eq!(account.total_asset_balance(), 1_000);
        assert_eq!(account.extract_asset_issue().total_asset_balance(), 1_000);
    }

    #[test]
    fn test_extract_from_assetless_account_is_default_groups() {
        let account = Account {
            address: Some(test_address(0x02)),
            name: "plain".to_string(),
            balance: 1,
            ..Account::default()
        };
        let asset_issue = account.extract_asset_issue();
        assert_eq!(asset_issue.address, account.address);
        assert_eq!(asset_issue.total_asset_balance(), 0);
        assert!(asset_issue.asset.is_empty());
    }
}
