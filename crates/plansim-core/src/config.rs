//! Simulator configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::{TierCatalog, DEFAULT_TIER_SET};
use crate::error::{PricingError, PricingResult};
use crate::exceptions::{ExceptionTable, HostOverride};
use crate::rollup::RegionalRollup;

/// Everything the engine needs besides hosts and tiers.
///
/// Passed explicitly into every operation; the engine reads no ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Tier set used when the caller does not pick one
    pub default_tier_set: String,
    /// Host snapshot file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,
    /// Single-host contractual exceptions
    pub exceptions: ExceptionTable,
    /// Accounts priced as one group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollup: Option<RegionalRollup>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            default_tier_set: DEFAULT_TIER_SET.into(),
            snapshot_path: None,
            exceptions: ExceptionTable::default(),
            rollup: Some(RegionalRollup::europe()),
        }
    }
}

impl SimulatorConfig {
    /// Configuration with no exceptions and no rollup
    pub fn plain() -> Self {
        Self {
            default_tier_set: DEFAULT_TIER_SET.into(),
            snapshot_path: None,
            exceptions: ExceptionTable::empty(),
            rollup: None,
        }
    }

    /// Check the configuration against the catalog it will run with
    pub fn validate(&self, catalog: &TierCatalog) -> PricingResult<()> {
        if !catalog.tier_set_ids().contains(&self.default_tier_set) {
            return Err(PricingError::Config(format!(
                "default tier set {:?} is not in the catalog",
                self.default_tier_set
            )));
        }

        for entry in Vec::<crate::exceptions::ExceptionEntry>::from(self.exceptions.clone()) {
            if let HostOverride::LegacyCollectiveOverage { price_per_collective } = entry.rule {
                if price_per_collective < 0 {
                    return Err(PricingError::Config(format!(
                        "host {}: negative legacy price per collective",
                        entry.host_id
                    )));
                }
            }
        }

        if let Some(rollup) = &self.rollup {
            if rollup.is_member(&rollup.primary_slug) {
                return Err(PricingError::Config(format!(
                    "rollup {:?} lists its primary as a member",
                    rollup.primary_slug
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::OPEN_SOURCE_COLLECTIVE_HOST_ID;

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.default_tier_set, "default");
        assert!(config.exceptions.uses_legacy_crowdfunding_fee(OPEN_SOURCE_COLLECTIVE_HOST_ID));
        assert_eq!(config.rollup.unwrap().primary_slug, "europe");
    }

    #[test]
    fn test_validate() {
        let catalog = TierCatalog::new();
        assert!(SimulatorConfig::default().validate(&catalog).is_ok());

        let unknown_set = SimulatorConfig { default_tier_set: "legacy".into(), ..SimulatorConfig::plain() };
        assert!(matches!(unknown_set.validate(&catalog), Err(PricingError::Config(_))));

        let negative = SimulatorConfig {
            exceptions: ExceptionTable::empty()
                .with(5, HostOverride::LegacyCollectiveOverage { price_per_collective: -1 }),
            ..SimulatorConfig::plain()
        };
        assert!(negative.validate(&catalog).is_err());

        let mut rollup = RegionalRollup::europe();
        rollup.member_slugs.push("europe".into());
        let looped = SimulatorConfig { rollup: Some(rollup), ..SimulatorConfig::plain() };
        assert!(looped.validate(&catalog).is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SimulatorConfig = toml::from_str(r#"default_tier_set = "alt-model""#).unwrap();
        assert_eq!(config.default_tier_set, "alt-model");
        assert!(!config.exceptions.is_empty());
        assert!(config.rollup.is_some());
    }

    #[test]
    fn test_toml_overrides() {
        let config: SimulatorConfig = toml::from_str(
            r#"
            [[exceptions]]
            host_id = 1
            rule = { kind = "legacy_crowdfunding_fee" }

            [rollup]
            primary_slug = "north"
            member_slugs = ["north-usd"]
            name = "North (aggregate)"
            "#,
        )
        .unwrap();

        assert!(config.exceptions.uses_legacy_crowdfunding_fee(1));
        assert!(!config.exceptions.uses_legacy_crowdfunding_fee(OPEN_SOURCE_COLLECTIVE_HOST_ID));
        let rollup = config.rollup.unwrap();
        assert_eq!(rollup.member_slugs, vec!["north-usd"]);
        assert_eq!(rollup.tax_forms, None);
    }
}
