//! Tier Catalog
//!
//! Static, versioned definitions of the pricing tiers, grouped into named
//! tier sets. Each set is one pricing-model proposal. Tiers are immutable for
//! the life of the process; operators may switch the active set but never
//! edit tiers at runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{PricingError, PricingResult};
use crate::money::Cents;

/// Identifier of the nine-tier default model
pub const DEFAULT_TIER_SET: &str = "default";
/// Identifier of the three-tier alternative model
pub const ALT_MODEL_TIER_SET: &str = "alt-model";

/// Tier classification, used for eligibility filtering and UI grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierType {
    /// Entry level ("Starter")
    Entry,
    /// Mid level ("Basic")
    Mid,
    /// Top level ("Pro")
    Top,
}

impl TierType {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Entry => "Starter",
            Self::Mid => "Basic",
            Self::Top => "Pro",
        }
    }
}

impl fmt::Display for TierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Base price plus included allowances and per-unit overage prices.
///
/// All prices are monthly, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingModel {
    /// Recurring base price
    pub price_per_month: Cents,
    /// Active collectives covered by the base price
    pub included_collectives: i64,
    /// Monthly price per collective above the allowance
    pub price_per_additional_collective: Cents,
    /// Paid expenses per month covered by the base price
    pub included_expenses_per_month: i64,
    /// Price per expense above the allowance
    pub price_per_additional_expense: Cents,
}

/// A named pricing plan within a tier set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Tier set this tier belongs to
    pub set: String,
    /// Display name, unique within the set
    pub title: String,
    /// Classification
    #[serde(rename = "type")]
    pub tier_type: TierType,
    /// Cost model
    pub pricing_model: PricingModel,
    /// Feature name -> included. Rendering only; the cost engine never reads it.
    pub features: BTreeMap<String, bool>,
}

/// Feature names shown in the comparison tables.
///
/// Each constant holds its display label.
#[allow(missing_docs)]
pub mod features {
    pub const ACCOUNT_MANAGEMENT: &str = "Account management";
    pub const SUBMIT_REVIEW_EXPENSES: &str = "Submit and review expenses";
    pub const MANUALLY_PAY_EXPENSES: &str = "Manually pay expenses";
    pub const UPDATES: &str = "Updates";
    pub const VENDORS: &str = "Vendors";
    pub const CROWDFUNDING: &str = "Crowdfunding";

    pub const PAY_WITH_WISE: &str = "Pay with Wise";
    pub const PAY_WITH_PAYPAL: &str = "Pay with PayPal";
    pub const ADVANCED_PERMISSIONS: &str = "Advanced permissions";
    pub const CHART_OF_ACCOUNTS: &str = "Chart of accounts";
    pub const HOSTED_COLLECTIVES: &str = "Hosted collectives";
    pub const ANTIFRAUD_SECURITY: &str = "Antifraud security checks";
    pub const EXPECTED_FUNDS: &str = "Expected funds";
    pub const CHARGE_HOSTING_FEES: &str = "Charge hosting fees";
    pub const RESTRICTED_FUNDS: &str = "Restricted funds";

    pub const AGREEMENTS: &str = "Agreements";
    pub const TAX_FORMS: &str = "Tax forms";
    pub const CONNECT_BANK_ACCOUNTS: &str = "Connect bank accounts";
    pub const FUNDS_GRANTS_MANAGEMENT: &str = "Funds & grants management";

    /// Every feature, in display order
    pub const ALL: [&str; 19] = [
        ACCOUNT_MANAGEMENT,
        SUBMIT_REVIEW_EXPENSES,
        MANUALLY_PAY_EXPENSES,
        UPDATES,
        VENDORS,
        CROWDFUNDING,
        PAY_WITH_WISE,
        PAY_WITH_PAYPAL,
        ADVANCED_PERMISSIONS,
        CHART_OF_ACCOUNTS,
        HOSTED_COLLECTIVES,
        ANTIFRAUD_SECURITY,
        EXPECTED_FUNDS,
        CHARGE_HOSTING_FEES,
        RESTRICTED_FUNDS,
        AGREEMENTS,
        TAX_FORMS,
        CONNECT_BANK_ACCOUNTS,
        FUNDS_GRANTS_MANAGEMENT,
    ];

    /// Index into [`ALL`] where the Basic-only features start
    pub(crate) const BASIC_START: usize = 6;
    /// Index into [`ALL`] where the Pro-only features start
    pub(crate) const PRO_START: usize = 15;
}

/// Feature matrix for a tier type. Each level includes everything below it.
pub fn features_for(tier_type: TierType) -> BTreeMap<String, bool> {
    let included = match tier_type {
        TierType::Entry => features::BASIC_START,
        TierType::Mid => features::PRO_START,
        TierType::Top => features::ALL.len(),
    };

    features::ALL
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i < included))
        .collect()
}

/// The static tier catalog
#[derive(Debug, Clone)]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl TierCatalog {
    /// Catalog with the built-in tier sets
    pub fn new() -> Self {
        let mut tiers = default_tiers();
        tiers.extend(alt_model_tiers());
        Self { tiers }
    }

    /// Catalog over an explicit tier list (catalog order is preserved)
    pub fn from_tiers(tiers: Vec<Tier>) -> Self {
        Self { tiers }
    }

    /// All tiers, in catalog order
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Tiers of one set, in catalog order
    pub fn tier_set(&self, set: &str) -> PricingResult<Vec<Tier>> {
        let tiers: Vec<Tier> = self.tiers.iter().filter(|t| t.set == set).cloned().collect();
        if tiers.is_empty() {
            return Err(PricingError::UnknownTierSet(set.to_string()));
        }
        Ok(tiers)
    }

    /// Distinct tier set ids, in first-seen order
    pub fn tier_set_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for tier in &self.tiers {
            if !ids.contains(&tier.set) {
                ids.push(tier.set.clone());
            }
        }
        ids
    }

    /// Look up a tier by set and title
    pub fn find(&self, set: &str, title: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.set == set && t.title == title)
    }
}

impl Default for TierCatalog {
    fn default() -> Self { Self::new() }
}

#[allow(clippy::too_many_arguments)]
fn tier(
    set: &str,
    title: &str,
    tier_type: TierType,
    price_per_month: Cents,
    included_collectives: i64,
    price_per_additional_collective: Cents,
    included_expenses_per_month: i64,
    price_per_additional_expense: Cents,
) -> Tier {
    Tier {
        set: set.into(),
        title: title.into(),
        tier_type,
        pricing_model: PricingModel {
            price_per_month,
            included_collectives,
            price_per_additional_collective,
            included_expenses_per_month,
            price_per_additional_expense,
        },
        features: features_for(tier_type),
    }
}

/// Nine-tier default model
fn default_tiers() -> Vec<Tier> {
    let set = DEFAULT_TIER_SET;
    vec![
        tier(set, "Starter", TierType::Entry, 0, 1, 1999, 5, 299),
        tier(set, "Basic S", TierType::Mid, 4900, 5, 1999, 25, 299),
        tier(set, "Basic M", TierType::Mid, 9900, 10, 1899, 50, 289),
        tier(set, "Basic L", TierType::Mid, 29900, 25, 1799, 100, 279),
        tier(set, "Basic XL", TierType::Mid, 49900, 50, 1699, 150, 269),
        tier(set, "Pro S", TierType::Top, 99900, 100, 1299, 500, 199),
        tier(set, "Pro M", TierType::Top, 249900, 250, 1199, 2000, 149),
        tier(set, "Pro L", TierType::Top, 499900, 500, 999, 5000, 99),
        tier(set, "Pro XL", TierType::Top, 1999900, 2500, 999, 25000, 99),
    ]
}

/// Three-tier alternative model: low base price, everything metered
fn alt_model_tiers() -> Vec<Tier> {
    let set = ALT_MODEL_TIER_SET;
    vec![
        tier(set, "Starter", TierType::Entry, 0, 0, 999, 5, 199),
        tier(set, "Basic", TierType::Mid, 4900, 0, 1099, 5, 299),
        tier(set, "Pro", TierType::Top, 9900, 0, 1199, 5, 349),
    ]
}
