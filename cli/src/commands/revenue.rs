//! Projected platform revenue

use plansim_core::{aggregate_revenue, aggregate_revenue_by_set, ProjectedRevenue};
use tabled::Tabled;

use super::Context;
use crate::output::{delta, money, table};

#[derive(Tabled)]
struct RevenueRow {
    #[tabled(rename = "Tier set")]
    tier_set: String,
    #[tabled(rename = "Hosts")]
    hosts: usize,
    #[tabled(rename = "Fees before")]
    before: String,
    #[tabled(rename = "Fees after")]
    after: String,
    #[tabled(rename = "Host plans")]
    host_plans: String,
    #[tabled(rename = "Platform tips")]
    platform_tips: String,
    #[tabled(rename = "Change")]
    change: String,
}

impl From<&ProjectedRevenue> for RevenueRow {
    fn from(revenue: &ProjectedRevenue) -> Self {
        Self {
            tier_set: revenue.tier_set.clone(),
            hosts: revenue.hosts_priced,
            before: money(revenue.before.fees),
            after: money(revenue.after.fees),
            host_plans: money(revenue.after.host_plans),
            platform_tips: money(revenue.after.platform_tips),
            change: delta(revenue.after.total() - revenue.before.total()),
        }
    }
}

pub fn handle(ctx: &Context, set: Option<&str>) -> Result<(), String> {
    let hosts = ctx.hosts()?;
    let projections = match set {
        Some(id) => {
            let tiers = ctx.tier_set(Some(id))?;
            vec![aggregate_revenue(&tiers, &hosts, &ctx.config).map_err(|e| e.to_string())?]
        }
        None => aggregate_revenue_by_set(&ctx.catalog, &hosts, &ctx.config).map_err(|e| e.to_string())?,
    };

    ctx.format.print(&projections, || {
        println!("Projected yearly revenue ({} hosts in snapshot)", hosts.len());
        println!("{}", table(projections.iter().map(RevenueRow::from).collect()));
    })
}
