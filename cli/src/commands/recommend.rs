//! Tier recommendation for a usage profile

use plansim_core::{
    best_tier_per_type, plan_summary, select_best_tier, Interval, PlanSummary, SelectedPlan,
    TierQuote, TierType, Usage,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

use super::Context;
use crate::output::{money, table};

#[derive(Debug, Serialize)]
struct Recommendation {
    usage: Usage,
    best: TierQuote,
    per_type: BTreeMap<TierType, TierQuote>,
    summary: Option<PlanSummary>,
}

#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "Type")]
    tier_type: String,
    #[tabled(rename = "Tier")]
    title: String,
    #[tabled(rename = "Extra collectives")]
    extra_collectives: String,
    #[tabled(rename = "Extra expenses")]
    extra_expenses: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Yearly")]
    yearly: String,
}

impl From<&TierQuote> for QuoteRow {
    fn from(quote: &TierQuote) -> Self {
        Self {
            tier_type: quote.tier.tier_type.to_string(),
            title: quote.tier.title.clone(),
            extra_collectives: format!(
                "{} ({})",
                quote.additional_collectives,
                money(quote.additional_collectives_cost)
            ),
            extra_expenses: format!(
                "{} ({})",
                quote.additional_expenses,
                money(quote.additional_expenses_cost)
            ),
            monthly: money(quote.monthly_cost),
            yearly: money(quote.yearly_cost),
        }
    }
}

pub fn handle(ctx: &Context, usage: Usage, set: Option<&str>, interval: Interval) -> Result<(), String> {
    usage.validate().map_err(|e| e.to_string())?;

    let tiers = ctx.tier_set(set)?;
    let best = select_best_tier(&tiers, &usage).map_err(|e| e.to_string())?;
    let per_type = best_tier_per_type(&tiers, &usage);
    let summary = plan_summary(
        &SelectedPlan::new(best.tier.clone(), interval),
        usage.expenses,
        usage.collectives,
    );

    let recommendation = Recommendation { usage, best, per_type, summary };

    ctx.format.print(&recommendation, || {
        println!(
            "Recommended tier: {} ({})",
            recommendation.best.tier.title, recommendation.best.tier.set
        );
        println!("{}", table(recommendation.per_type.values().map(QuoteRow::from).collect()));

        if let Some(summary) = &recommendation.summary {
            println!();
            println!("{} plan, billed {}", summary.tier_title, summary.interval);
            println!("  Base price:        {}", money(summary.base_price));
            println!(
                "  Extra expenses:    {} x {}/month = {}",
                summary.extra_expenses_per_month,
                money(recommendation.best.tier.pricing_model.price_per_additional_expense),
                money(summary.extra_expenses_amount)
            );
            println!(
                "  Extra collectives: {} x {}/month = {}",
                summary.extra_collectives_per_month,
                money(recommendation.best.tier.pricing_model.price_per_additional_collective),
                money(summary.extra_collectives_amount)
            );
            println!("  Total:             {}", money(summary.total));
        }
    })
}
