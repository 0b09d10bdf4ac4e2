//! Tier catalog listing

use plansim_core::Tier;
use tabled::Tabled;

use super::Context;
use crate::output::{money, table};

#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Set")]
    set: String,
    #[tabled(rename = "Tier")]
    title: String,
    #[tabled(rename = "Type")]
    tier_type: String,
    #[tabled(rename = "Price / month")]
    price: String,
    #[tabled(rename = "Collectives incl.")]
    included_collectives: i64,
    #[tabled(rename = "Extra collective")]
    extra_collective: String,
    #[tabled(rename = "Expenses incl.")]
    included_expenses: i64,
    #[tabled(rename = "Extra expense")]
    extra_expense: String,
}

impl From<&Tier> for TierRow {
    fn from(tier: &Tier) -> Self {
        let model = &tier.pricing_model;
        Self {
            set: tier.set.clone(),
            title: tier.title.clone(),
            tier_type: tier.tier_type.to_string(),
            price: money(model.price_per_month),
            included_collectives: model.included_collectives,
            extra_collective: money(model.price_per_additional_collective),
            included_expenses: model.included_expenses_per_month,
            extra_expense: money(model.price_per_additional_expense),
        }
    }
}

pub fn handle(ctx: &Context, set: Option<&str>) -> Result<(), String> {
    let tiers: Vec<Tier> = match set {
        Some(id) => ctx.tier_set(Some(id))?,
        None => ctx.catalog.tiers().to_vec(),
    };

    ctx.format.print(&tiers, || {
        println!("{}", table(tiers.iter().map(TierRow::from).collect()));
    })
}
