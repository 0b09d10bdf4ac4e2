//! Fee Comparator
//!
//! Side-by-side cost of a host under the legacy percentage-fee model
//! ("before") and under a subscription tier ("after").
//!
//! Legacy figures are naturally annual: they come from trailing-year totals
//! and are divided by twelve for a monthly view. Tier figures are naturally
//! monthly and are multiplied up for a yearly view, except the base price,
//! which bills [`YEARLY_BASE_MONTHS`] months.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{PricingModel, Tier};
use crate::exceptions::ExceptionTable;
use crate::host::Host;
use crate::metrics::derive_metrics;
use crate::money::{apply_rate, div_round, Cents, MONTHS_PER_YEAR};
use crate::selector::YEARLY_BASE_MONTHS;

/// Legacy platform fee on money raised through crowdfunding
pub const CROWDFUNDING_FEE_RATE: Decimal = dec!(0.05);

/// Legacy platform cut of the host fees a host earns outside crowdfunding
pub const NON_CROWDFUNDING_FEE_RATE: Decimal = dec!(0.15);

/// Billing interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    /// Amounts per month
    #[default]
    Monthly,
    /// Amounts per year, base price discounted
    Yearly,
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => f.write_str("monthly"),
            Self::Yearly => f.write_str("yearly"),
        }
    }
}

/// Plan chosen in the simulator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectedPlan {
    /// Chosen tier; nothing can be priced without one
    pub tier: Option<Tier>,
    /// Billing interval amounts are reported in
    pub interval: Interval,
}

impl SelectedPlan {
    /// Plan with a tier chosen
    pub fn new(tier: Tier, interval: Interval) -> Self {
        Self { tier: Some(tier), interval }
    }
}

/// One side of the comparison. Amounts are per period of the interval.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeeSide {
    /// Platform share of crowdfunding contributions
    pub platform_fees_on_crowdfunding: Cents,
    /// Platform share of host fees earned outside crowdfunding
    pub platform_fees_on_non_crowdfunding: Cents,
    /// Subscription base price
    pub base_price: Cents,
    /// Charge for collectives above the allowance
    pub extra_collectives_amount: Cents,
    /// Collectives billed per month
    pub extra_collectives_per_month: i64,
    /// Unit price behind `extra_collectives_amount`
    pub price_per_additional_collective: Cents,
    /// Charge for expenses above the allowance
    pub extra_expenses_amount: Cents,
    /// Expenses billed per month
    pub extra_expenses_per_month: i64,
    /// Unit price behind `extra_expenses_amount`
    pub price_per_additional_expense: Cents,
    /// Base price plus extras
    pub total_host_plans: Cents,
    /// Platform fees plus host plans
    pub total: Cents,
}

impl FeeSide {
    fn finish(mut self) -> Self {
        self.total_host_plans =
            self.base_price + self.extra_collectives_amount + self.extra_expenses_amount;
        self.total = self.platform_fees_on_crowdfunding
            + self.platform_fees_on_non_crowdfunding
            + self.total_host_plans;
        self
    }
}

/// Legacy vs. tier model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Period every amount covers
    pub interval: Interval,
    /// Legacy percentage-fee model
    pub before: FeeSide,
    /// Subscription tier model
    pub after: FeeSide,
}

impl FeeBreakdown {
    /// `after.total - before.total`
    pub fn delta(&self) -> Cents {
        self.after.total - self.before.total
    }
}

/// Scale an annual figure to the interval
fn from_annual(amount: Cents, interval: Interval) -> Cents {
    match interval {
        Interval::Monthly => div_round(amount, MONTHS_PER_YEAR),
        Interval::Yearly => amount,
    }
}

/// Scale a monthly overage figure to the interval (never discounted)
fn from_monthly(amount: Cents, interval: Interval) -> Cents {
    match interval {
        Interval::Monthly => amount,
        Interval::Yearly => amount * MONTHS_PER_YEAR,
    }
}

/// Base price for the interval, with the yearly discount
fn base_price_for(model: &PricingModel, interval: Interval) -> Cents {
    match interval {
        Interval::Monthly => model.price_per_month,
        Interval::Yearly => model.price_per_month * YEARLY_BASE_MONTHS,
    }
}

/// Tier-model charges for a usage level
fn tier_side(model: &PricingModel, expenses: i64, collectives: i64, interval: Interval) -> FeeSide {
    let extra_collectives_per_month = (collectives - model.included_collectives).max(0);
    let extra_expenses_per_month = (expenses - model.included_expenses_per_month).max(0);

    FeeSide {
        base_price: base_price_for(model, interval),
        extra_collectives_per_month,
        price_per_additional_collective: model.price_per_additional_collective,
        extra_collectives_amount: from_monthly(
            extra_collectives_per_month * model.price_per_additional_collective,
            interval,
        ),
        extra_expenses_per_month,
        price_per_additional_expense: model.price_per_additional_expense,
        extra_expenses_amount: from_monthly(
            extra_expenses_per_month * model.price_per_additional_expense,
            interval,
        ),
        ..Default::default()
    }
}

/// Compare a host's legacy fees with the selected plan.
///
/// Returns `None` when no tier is selected: the caller must choose one first.
pub fn calculate_fees(
    host: &Host,
    selected_plan: &SelectedPlan,
    exceptions: &ExceptionTable,
) -> Option<FeeBreakdown> {
    let tier = selected_plan.tier.as_ref()?;
    let interval = selected_plan.interval;
    let metrics = derive_metrics(host, exceptions);

    let annual_crowdfunding = if metrics.platform_tips {
        0
    } else {
        apply_rate(host.total_raised_crowdfunding_usd, CROWDFUNDING_FEE_RATE)
    };
    let annual_non_crowdfunding =
        apply_rate(metrics.host_fees_non_crowdfunding_usd, NON_CROWDFUNDING_FEE_RATE);

    let mut before = FeeSide {
        platform_fees_on_crowdfunding: from_annual(annual_crowdfunding, interval),
        platform_fees_on_non_crowdfunding: from_annual(annual_non_crowdfunding, interval),
        ..Default::default()
    };

    if let Some(price) = exceptions.legacy_collective_price(host.id) {
        before.extra_collectives_per_month = metrics.avg_active_collectives_per_month;
        before.price_per_additional_collective = price;
        before.extra_collectives_amount =
            from_monthly(metrics.avg_active_collectives_per_month * price, interval);
    }
    let before = before.finish();

    let after = FeeSide {
        // Crowdfunding fee policy is unchanged by the tier model.
        platform_fees_on_crowdfunding: before.platform_fees_on_crowdfunding,
        platform_fees_on_non_crowdfunding: 0,
        ..tier_side(
            &tier.pricing_model,
            metrics.avg_expenses_per_month,
            metrics.avg_active_collectives_per_month,
            interval,
        )
    }
    .finish();

    Some(FeeBreakdown { interval, before, after })
}

/// Plan cost for slider-driven usage, without a host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Selected tier
    pub tier_title: String,
    /// Period the amounts cover
    pub interval: Interval,
    /// Base price for the interval
    pub base_price: Cents,
    /// Expenses above the allowance, per month
    pub extra_expenses_per_month: i64,
    /// Charge for those expenses over the interval
    pub extra_expenses_amount: Cents,
    /// Collectives above the allowance, per month
    pub extra_collectives_per_month: i64,
    /// Charge for those collectives over the interval
    pub extra_collectives_amount: Cents,
    /// Base price plus extras
    pub total: Cents,
}

/// Summarize the selected plan for a usage level
pub fn plan_summary(selected_plan: &SelectedPlan, expenses: i64, collectives: i64) -> Option<PlanSummary> {
    let tier = selected_plan.tier.as_ref()?;
    let side = tier_side(&tier.pricing_model, expenses, collectives, selected_plan.interval).finish();

    Some(PlanSummary {
        tier_title: tier.title.clone(),
        interval: selected_plan.interval,
        base_price: side.base_price,
        extra_expenses_per_month: side.extra_expenses_per_month,
        extra_expenses_amount: side.extra_expenses_amount,
        extra_collectives_per_month: side.extra_collectives_per_month,
        extra_collectives_amount: side.extra_collectives_amount,
        total: side.total,
    })
}
