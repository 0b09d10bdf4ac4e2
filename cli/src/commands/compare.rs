//! Fee comparison for a single host

use plansim_core::{
    calculate_fees, derive_metrics, find_host, select_best_tier, FeeBreakdown, Interval,
    SelectedPlan, Usage, UsageMetrics,
};
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::{delta, money, table};

#[derive(Debug, Serialize)]
struct Comparison {
    slug: String,
    name: String,
    metrics: UsageMetrics,
    tier: String,
    fees: FeeBreakdown,
}

#[derive(Tabled)]
struct FeeRow {
    #[tabled(rename = "")]
    line: &'static str,
    #[tabled(rename = "Before")]
    before: String,
    #[tabled(rename = "After")]
    after: String,
}

impl FeeRow {
    fn new(line: &'static str, before: i64, after: i64) -> Self {
        Self { line, before: money(before), after: money(after) }
    }
}

pub fn handle(ctx: &Context, slug: &str, set: Option<&str>, interval: Interval) -> Result<(), String> {
    let hosts = ctx.hosts()?;
    let host = find_host(&hosts, slug, ctx.config.rollup.as_ref())
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Host not found: {}", slug))?;

    let metrics = derive_metrics(&host, &ctx.config.exceptions);
    let usage = Usage {
        expenses: metrics.avg_expenses_per_month,
        collectives: metrics.avg_active_collectives_per_month,
        automated_payouts: host.automated_payouts,
        tax_forms: host.tax_forms,
    };
    let tiers = ctx.tier_set(set)?;
    let best = select_best_tier(&tiers, &usage).map_err(|e| e.to_string())?;
    let fees = calculate_fees(&host, &SelectedPlan::new(best.tier.clone(), interval), &ctx.config.exceptions)
        .ok_or("No tier selected")?;

    let comparison = Comparison {
        slug: host.slug.clone(),
        name: host.name.clone(),
        metrics,
        tier: best.tier.title,
        fees,
    };

    ctx.format.print(&comparison, || {
        let m = &comparison.metrics;
        let (before, after) = (&comparison.fees.before, &comparison.fees.after);
        println!("{} ({})", comparison.name, comparison.slug);
        println!(
            "  {} expenses/month, {} active collectives/month, {}",
            m.avg_expenses_per_month,
            m.avg_active_collectives_per_month,
            if m.platform_tips { "platform tips" } else { "legacy crowdfunding fee" }
        );
        println!("  Best tier: {}, billed {}", comparison.tier, comparison.fees.interval);

        let rows = vec![
            FeeRow::new(
                "Platform fees on crowdfunding",
                before.platform_fees_on_crowdfunding,
                after.platform_fees_on_crowdfunding,
            ),
            FeeRow::new(
                "Platform fees on other income",
                before.platform_fees_on_non_crowdfunding,
                after.platform_fees_on_non_crowdfunding,
            ),
            FeeRow::new("Base price", before.base_price, after.base_price),
            FeeRow::new(
                "Extra collectives",
                before.extra_collectives_amount,
                after.extra_collectives_amount,
            ),
            FeeRow::new("Extra expenses", before.extra_expenses_amount, after.extra_expenses_amount),
            FeeRow::new("Total", before.total, after.total),
        ];
        println!("{}", table(rows));
        println!("Difference: {}", delta(comparison.fees.delta()));
    })
}
