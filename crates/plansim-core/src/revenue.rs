//! Revenue Aggregator
//!
//! Prices every host with its best tier and sums the legacy and tier-model
//! revenue into platform-wide, annualized totals.

use serde::{Deserialize, Serialize};

use crate::catalog::{Tier, TierCatalog};
use crate::config::SimulatorConfig;
use crate::error::PricingResult;
use crate::fees::{calculate_fees, FeeBreakdown, Interval, SelectedPlan};
use crate::host::Host;
use crate::metrics::derive_metrics;
use crate::money::{Cents, MONTHS_PER_YEAR};
use crate::rollup::apply_rollup;
use crate::selector::{select_best_tier, Usage};

/// Annual revenue on one side of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevenueTotals {
    /// Platform share of crowdfunding contributions
    pub platform_fees_on_crowdfunding: Cents,
    /// Platform share of non-crowdfunding host fees
    pub platform_fees_on_non_crowdfunding: Cents,
    /// Subscription revenue (base price plus extras)
    pub host_plans: Cents,
    /// All fees charged to hosts
    pub fees: Cents,
    /// Voluntary contributions; identical on both sides
    pub platform_tips: Cents,
}

impl RevenueTotals {
    /// Fees plus platform tips
    pub fn total(&self) -> Cents {
        self.fees + self.platform_tips
    }
}

/// Platform-wide projection for one tier set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedRevenue {
    /// Tier set the hosts were priced with
    pub tier_set: String,
    /// Hosts that contributed fees
    pub hosts_priced: usize,
    /// Legacy model
    pub before: RevenueTotals,
    /// Tier model
    pub after: RevenueTotals,
}

/// Running sums of an aggregation pass
#[derive(Debug, Default)]
pub struct RevenueAccumulator {
    hosts_priced: usize,
    before: RevenueTotals,
    after: RevenueTotals,
}

impl RevenueAccumulator {
    /// Empty sums
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one host, given its monthly fee breakdown.
    ///
    /// A host without a breakdown contributes its platform tips only.
    pub fn add_host(&mut self, fees: Option<&FeeBreakdown>, platform_tips: Cents) {
        self.before.platform_tips += platform_tips;
        self.after.platform_tips += platform_tips;

        let Some(fees) = fees else {
            return;
        };
        debug_assert_eq!(fees.interval, Interval::Monthly);

        self.hosts_priced += 1;
        for (totals, side) in [(&mut self.before, &fees.before), (&mut self.after, &fees.after)] {
            totals.fees += side.total * MONTHS_PER_YEAR;
            totals.platform_fees_on_crowdfunding +=
                side.platform_fees_on_crowdfunding * MONTHS_PER_YEAR;
            totals.platform_fees_on_non_crowdfunding +=
                side.platform_fees_on_non_crowdfunding * MONTHS_PER_YEAR;
            totals.host_plans += side.total_host_plans * MONTHS_PER_YEAR;
        }
    }

    /// Final totals
    pub fn finish(self, tier_set: impl Into<String>) -> ProjectedRevenue {
        ProjectedRevenue {
            tier_set: tier_set.into(),
            hosts_priced: self.hosts_priced,
            before: self.before,
            after: self.after,
        }
    }
}

/// Monthly fee breakdown of a host under its best tier from `tiers`
pub fn price_host(host: &Host, tiers: &[Tier], config: &SimulatorConfig) -> PricingResult<Option<FeeBreakdown>> {
    let metrics = derive_metrics(host, &config.exceptions);
    let usage = Usage {
        expenses: metrics.avg_expenses_per_month,
        collectives: metrics.avg_active_collectives_per_month,
        automated_payouts: host.automated_payouts,
        tax_forms: host.tax_forms,
    };
    let best = select_best_tier(tiers, &usage)?;
    let plan = SelectedPlan::new(best.tier, Interval::Monthly);
    Ok(calculate_fees(host, &plan, &config.exceptions))
}

/// Project annual platform revenue for a tier set.
///
/// Fees are computed per host at monthly granularity and annualized by
/// twelve. The configured rollup replaces its primary account and hides its
/// members. A tier selection failure aborts the pass: it means the tier set
/// cannot price that host.
pub fn aggregate_revenue(tiers: &[Tier], hosts: &[Host], config: &SimulatorConfig) -> PricingResult<ProjectedRevenue> {
    let tier_set = tiers.first().map(|t| t.set.clone()).unwrap_or_default();
    let hosts = apply_rollup(hosts, config.rollup.as_ref())?;
    let mut acc = RevenueAccumulator::new();

    for host in &hosts {
        let fees = price_host(host, tiers, config)?;
        if fees.is_none() {
            tracing::debug!(host = %host.slug, "no fee breakdown, host skipped");
        }
        acc.add_host(fees.as_ref(), host.total_platform_tips);
    }

    let projection = acc.finish(tier_set);
    tracing::info!(
        tier_set = %projection.tier_set,
        hosts = projection.hosts_priced,
        before = projection.before.fees,
        after = projection.after.fees,
        "revenue projected"
    );
    Ok(projection)
}

/// Project revenue for every tier set in the catalog, in catalog order
pub fn aggregate_revenue_by_set(
    catalog: &TierCatalog,
    hosts: &[Host],
    config: &SimulatorConfig,
) -> PricingResult<Vec<ProjectedRevenue>> {
    catalog
        .tier_set_ids()
        .iter()
        .map(|set| aggregate_revenue(&catalog.tier_set(set)?, hosts, config))
        .collect()
}
