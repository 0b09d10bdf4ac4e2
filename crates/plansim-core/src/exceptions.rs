//! Single-host contractual exceptions
//!
//! A handful of hosts are priced under explicit, signed-off carve-outs. They
//! are kept in an injectable table keyed by host id so every carve-out is
//! auditable and testable on its own. Adding, generalizing or removing an
//! entry changes projected revenue and needs product sign-off.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::money::Cents;

/// Open Source Collective
pub const OPEN_SOURCE_COLLECTIVE_HOST_ID: i64 = 11004;

/// Legacy monthly price per hosted collective under the historical contract
pub const LEGACY_PRICE_PER_COLLECTIVE: Cents = 1000;

/// Override rule applied to one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostOverride {
    /// Host does not use the platform-tips model; the legacy crowdfunding
    /// fee applies instead
    LegacyCrowdfundingFee,
    /// Host pays a fixed legacy monthly price for every active collective
    /// under the legacy model
    LegacyCollectiveOverage {
        /// Monthly price per active collective
        price_per_collective: Cents,
    },
}

/// One configured rule, as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionEntry {
    /// Host the rule applies to
    pub host_id: i64,
    /// Override applied to that host
    pub rule: HostOverride,
}

/// Host id -> override rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ExceptionEntry>", into = "Vec<ExceptionEntry>")]
pub struct ExceptionTable {
    hosts: BTreeMap<i64, Vec<HostOverride>>,
}

impl From<Vec<ExceptionEntry>> for ExceptionTable {
    fn from(entries: Vec<ExceptionEntry>) -> Self {
        let mut table = Self::empty();
        for entry in entries {
            table.insert(entry.host_id, entry.rule);
        }
        table
    }
}

impl From<ExceptionTable> for Vec<ExceptionEntry> {
    fn from(table: ExceptionTable) -> Self {
        table
            .hosts
            .into_iter()
            .flat_map(|(host_id, rules)| {
                rules.into_iter().map(move |rule| ExceptionEntry { host_id, rule })
            })
            .collect()
    }
}

impl ExceptionTable {
    /// Table with no exceptions
    pub fn empty() -> Self {
        Self { hosts: BTreeMap::new() }
    }

    /// Add a rule for a host
    pub fn with(mut self, host_id: i64, rule: HostOverride) -> Self {
        self.insert(host_id, rule);
        self
    }

    /// Add a rule for a host; a second rule of the same kind replaces the first
    pub fn insert(&mut self, host_id: i64, rule: HostOverride) {
        let rules = self.hosts.entry(host_id).or_default();
        rules.retain(|r| std::mem::discriminant(r) != std::mem::discriminant(&rule));
        rules.push(rule);
    }

    /// Rules for a host
    pub fn rules_for(&self, host_id: i64) -> &[HostOverride] {
        self.hosts.get(&host_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the host is priced with the legacy crowdfunding fee
    pub fn uses_legacy_crowdfunding_fee(&self, host_id: i64) -> bool {
        self.rules_for(host_id)
            .iter()
            .any(|r| matches!(r, HostOverride::LegacyCrowdfundingFee))
    }

    /// Legacy per-collective price for the host, if it has one
    pub fn legacy_collective_price(&self, host_id: i64) -> Option<Cents> {
        self.rules_for(host_id).iter().find_map(|r| match r {
            HostOverride::LegacyCollectiveOverage { price_per_collective } => {
                Some(*price_per_collective)
            }
            _ => None,
        })
    }

    /// Number of hosts with at least one rule
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Default for ExceptionTable {
    /// The platform's signed-off carve-outs
    fn default() -> Self {
        Self::empty()
            .with(OPEN_SOURCE_COLLECTIVE_HOST_ID, HostOverride::LegacyCrowdfundingFee)
            .with(
                OPEN_SOURCE_COLLECTIVE_HOST_ID,
                HostOverride::LegacyCollectiveOverage {
                    price_per_collective: LEGACY_PRICE_PER_COLLECTIVE,
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = ExceptionTable::default();
        assert!(table.uses_legacy_crowdfunding_fee(OPEN_SOURCE_COLLECTIVE_HOST_ID));
        assert_eq!(
            table.legacy_collective_price(OPEN_SOURCE_COLLECTIVE_HOST_ID),
            Some(LEGACY_PRICE_PER_COLLECTIVE)
        );
        assert!(!table.uses_legacy_crowdfunding_fee(1));
        assert_eq!(table.legacy_collective_price(1), None);
    }

    #[test]
    fn test_insert_replaces_same_rule_kind() {
        let mut table = ExceptionTable::empty();
        table.insert(5, HostOverride::LegacyCollectiveOverage { price_per_collective: 100 });
        table.insert(5, HostOverride::LegacyCollectiveOverage { price_per_collective: 250 });
        table.insert(5, HostOverride::LegacyCrowdfundingFee);

        assert_eq!(table.rules_for(5).len(), 2);
        assert_eq!(table.legacy_collective_price(5), Some(250));
        assert_eq!(table.len(), 1);
    }

    #[derive(Deserialize)]
    struct Wrapper {
        exceptions: ExceptionTable,
    }

    #[test]
    fn test_table_from_toml() {
        let wrapper: Wrapper = toml::from_str(
            r#"
            [[exceptions]]
            host_id = 77
            rule = { kind = "legacy_crowdfunding_fee" }

            [[exceptions]]
            host_id = 77
            rule = { kind = "legacy_collective_overage", price_per_collective = 500 }
            "#,
        )
        .unwrap();

        let table = wrapper.exceptions;
        assert!(table.uses_legacy_crowdfunding_fee(77));
        assert_eq!(table.legacy_collective_price(77), Some(500));
        assert!(!table.uses_legacy_crowdfunding_fee(78));
    }
}
