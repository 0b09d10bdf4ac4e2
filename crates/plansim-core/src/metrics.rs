//! Usage Metrics Deriver
//!
//! Turns a host's trailing-twelve-month history into per-month averages and
//! the inputs of the legacy fee model.

use serde::{Deserialize, Serialize};

use crate::exceptions::ExceptionTable;
use crate::host::{Host, MonthlyCount};
use crate::money::{div_round, Cents, MONTHS_PER_YEAR};

/// Normalized per-host figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetrics {
    /// Paid expenses per month over the trailing year
    pub avg_expenses_per_month: i64,
    /// Active collectives per month over the trailing year
    pub avg_active_collectives_per_month: i64,
    /// Host is on the platform-tips model (no legacy crowdfunding fee)
    pub platform_tips: bool,
    /// Host fees charged on crowdfunding
    pub host_fees_crowdfunding_usd: Cents,
    /// Host fees charged on everything else
    pub host_fees_non_crowdfunding_usd: Cents,
    /// Platform tips received through the host
    pub total_platform_tips: Cents,
}

/// Average of a monthly series over a full year.
///
/// The divisor is always twelve: months missing from the series count as
/// zero rather than being left out of the average.
pub fn yearly_average(series: &[MonthlyCount]) -> i64 {
    let total: i64 = series.iter().map(|m| m.count).sum();
    div_round(total, MONTHS_PER_YEAR)
}

/// Derive the usage metrics of a host
pub fn derive_metrics(host: &Host, exceptions: &ExceptionTable) -> UsageMetrics {
    UsageMetrics {
        avg_expenses_per_month: yearly_average(&host.monthly_expenses),
        avg_active_collectives_per_month: yearly_average(&host.monthly_active_collectives),
        platform_tips: !exceptions.uses_legacy_crowdfunding_fee(host.id),
        host_fees_crowdfunding_usd: host.total_host_fees_crowdfunding_usd,
        host_fees_non_crowdfunding_usd: host.total_host_fees_usd
            - host.total_host_fees_crowdfunding_usd,
        total_platform_tips: host.total_platform_tips,
    }
}
