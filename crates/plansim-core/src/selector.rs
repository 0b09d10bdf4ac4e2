//! Tier Selector
//!
//! Filters a tier set by feature eligibility, prices every eligible tier for
//! the given usage and picks the cheapest one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Tier, TierType};
use crate::error::{PricingError, PricingResult};
use crate::money::{Cents, MONTHS_PER_YEAR};

/// Months billed for the base price on a yearly plan ("2 months free").
///
/// Only the base price is discounted; overage always bills all twelve
/// months. The older eleven-month variant is superseded.
pub const YEARLY_BASE_MONTHS: i64 = 10;

/// Largest monthly expense or collective count accepted for pricing
pub const MAX_USAGE_UNITS: i64 = 1_000_000_000;

/// Usage profile a tier is priced against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Paid expenses per month
    pub expenses: i64,
    /// Active collectives per month
    pub collectives: i64,
    /// Host needs automated payouts (rules out entry tiers)
    pub automated_payouts: bool,
    /// Host needs tax forms (top tiers only)
    pub tax_forms: bool,
}

impl Usage {
    /// Reject counts that are negative or beyond [`MAX_USAGE_UNITS`]
    pub fn validate(&self) -> PricingResult<()> {
        for (name, value) in [("expenses", self.expenses), ("collectives", self.collectives)] {
            if !(0..=MAX_USAGE_UNITS).contains(&value) {
                return Err(PricingError::InvalidUsage(format!(
                    "{name} must be between 0 and {MAX_USAGE_UNITS}, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A tier priced for a usage profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierQuote {
    /// Tier priced
    pub tier: Tier,
    /// Expenses above the allowance
    pub additional_expenses: i64,
    /// Monthly charge for them
    pub additional_expenses_cost: Cents,
    /// Collectives above the allowance
    pub additional_collectives: i64,
    /// Monthly charge for them
    pub additional_collectives_cost: Cents,
    /// Base price plus overage
    pub monthly_cost: Cents,
    /// Discounted base plus twelve months of overage
    pub yearly_cost: Cents,
}

/// Price a single tier for a usage profile.
///
/// Amounts saturate instead of wrapping; [`Usage::validate`] keeps real
/// profiles far below that point.
pub fn quote_tier(tier: &Tier, usage: &Usage) -> TierQuote {
    let model = &tier.pricing_model;

    let additional_expenses = usage.expenses.saturating_sub(model.included_expenses_per_month).max(0);
    let additional_expenses_cost = additional_expenses.saturating_mul(model.price_per_additional_expense);

    let additional_collectives = usage.collectives.saturating_sub(model.included_collectives).max(0);
    let additional_collectives_cost =
        additional_collectives.saturating_mul(model.price_per_additional_collective);

    let overage = additional_expenses_cost.saturating_add(additional_collectives_cost);

    TierQuote {
        tier: tier.clone(),
        additional_expenses,
        additional_expenses_cost,
        additional_collectives,
        additional_collectives_cost,
        monthly_cost: model.price_per_month.saturating_add(overage),
        yearly_cost: (model.price_per_month * YEARLY_BASE_MONTHS)
            .saturating_add(overage.saturating_mul(MONTHS_PER_YEAR)),
    }
}

/// Whether a tier can be offered to a host with these feature flags.
///
/// Tax forms need a top tier; automated payouts rule out the entry tier.
pub fn is_eligible(tier: &Tier, usage: &Usage) -> bool {
    if usage.tax_forms {
        tier.tier_type == TierType::Top
    } else if usage.automated_payouts {
        tier.tier_type != TierType::Entry
    } else {
        true
    }
}

/// Select the cheapest eligible tier by yearly cost.
///
/// Ties go to the tier listed first. An empty eligible set is a catalog
/// misconfiguration and is reported, never papered over.
pub fn select_best_tier(tiers: &[Tier], usage: &Usage) -> PricingResult<TierQuote> {
    usage.validate()?;
    let mut best: Option<TierQuote> = None;

    for tier in tiers.iter().filter(|t| is_eligible(t, usage)) {
        let quote = quote_tier(tier, usage);
        let cheaper = best
            .as_ref()
            .map(|b| quote.yearly_cost < b.yearly_cost)
            .unwrap_or(true);
        if cheaper {
            best = Some(quote);
        }
    }

    best.ok_or_else(|| PricingError::NoEligibleTier {
        tier_set: tiers.first().map(|t| t.set.clone()).unwrap_or_default(),
        tax_forms: usage.tax_forms,
        automated_payouts: usage.automated_payouts,
    })
}

/// Cheapest tier inside each tier type, by monthly cost.
///
/// Feeds the per-type plan columns; no eligibility filter is applied.
pub fn best_tier_per_type(tiers: &[Tier], usage: &Usage) -> BTreeMap<TierType, TierQuote> {
    let mut best: BTreeMap<TierType, TierQuote> = BTreeMap::new();

    for tier in tiers {
        let quote = quote_tier(tier, usage);
        match best.get(&tier.tier_type) {
            Some(current) if current.monthly_cost <= quote.monthly_cost => {}
            _ => {
                best.insert(tier.tier_type, quote);
            }
        }
    }

    best
}
