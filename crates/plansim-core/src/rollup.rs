//! Regional rollup
//!
//! Some organisations run several host accounts that are priced as one. The
//! rollup folds the constituent accounts into a single synthesized host:
//! monthly series are summed month by month and cumulative totals are summed.
//! The synthesized record replaces the primary account and the remaining
//! constituents are left out, so the group is priced exactly once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PricingError, PricingResult};
use crate::host::{Host, MonthlyCount};

/// A group of host accounts priced as one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalRollup {
    /// Slug of the account the rollup replaces
    pub primary_slug: String,
    /// Other accounts folded into the rollup
    #[serde(default)]
    pub member_slugs: Vec<String>,
    /// Extra slug resolving to the rollup in lookups
    #[serde(default)]
    pub alias: Option<String>,
    /// Display name of the synthesized host
    pub name: String,
    /// Feature flags of the group, when known better than the primary's
    #[serde(default)]
    pub automated_payouts: Option<bool>,
    /// Tax form flag of the group, same rule
    #[serde(default)]
    pub tax_forms: Option<bool>,
}

impl RegionalRollup {
    /// Open Collective Europe and its two foundation accounts
    pub fn europe() -> Self {
        Self {
            primary_slug: "europe".into(),
            member_slugs: vec!["oce-foundation-usd".into(), "oce-foundation-eur".into()],
            alias: Some("oce".into()),
            name: "Open Collective Europe (aggregate)".into(),
            // TODO: derive both flags from the member accounts once the
            // snapshot carries them for the foundations.
            automated_payouts: Some(true),
            tax_forms: Some(true),
        }
    }

    /// Whether `slug` is a member folded into (and hidden by) the rollup
    pub fn is_member(&self, slug: &str) -> bool {
        self.member_slugs.iter().any(|m| m == slug)
    }

    /// Whether `slug` is the lookup alias of the rollup.
    ///
    /// The primary slug keeps naming the primary account's own record.
    pub fn resolves(&self, slug: &str) -> bool {
        self.alias.as_deref() == Some(slug)
    }

    /// Synthesize the rollup host from the full host list.
    ///
    /// The primary account must be present; missing members are skipped.
    pub fn build(&self, hosts: &[Host]) -> PricingResult<Host> {
        let primary = hosts
            .iter()
            .find(|h| h.slug == self.primary_slug)
            .ok_or_else(|| {
                PricingError::InvalidHost(format!("rollup primary {:?} not found", self.primary_slug))
            })?;

        let constituents: Vec<&Host> = std::iter::once(primary)
            .chain(hosts.iter().filter(|h| self.is_member(&h.slug)))
            .collect();

        tracing::debug!(
            rollup = %self.primary_slug,
            constituents = constituents.len(),
            "building regional rollup"
        );

        let mut rollup = primary.clone();
        rollup.name = self.name.clone();
        rollup.monthly_expenses = sum_series(constituents.iter().map(|h| &h.monthly_expenses));
        rollup.monthly_active_collectives =
            sum_series(constituents.iter().map(|h| &h.monthly_active_collectives));
        rollup.total_collectives = constituents.iter().map(|h| h.total_collectives).sum();
        rollup.total_raised_crowdfunding_usd =
            constituents.iter().map(|h| h.total_raised_crowdfunding_usd).sum();
        rollup.total_raised_non_crowdfunding_usd =
            constituents.iter().map(|h| h.total_raised_non_crowdfunding_usd).sum();
        rollup.total_platform_tips = constituents.iter().map(|h| h.total_platform_tips).sum();
        rollup.total_host_fees_usd = constituents.iter().map(|h| h.total_host_fees_usd).sum();
        rollup.total_host_fees_crowdfunding_usd =
            constituents.iter().map(|h| h.total_host_fees_crowdfunding_usd).sum();

        if let Some(flag) = self.automated_payouts {
            rollup.automated_payouts = flag;
        }
        if let Some(flag) = self.tax_forms {
            rollup.tax_forms = flag;
        }

        Ok(rollup)
    }
}

/// Sum monthly series month by month, ordered by month
fn sum_series<'a>(series: impl Iterator<Item = &'a Vec<MonthlyCount>>) -> Vec<MonthlyCount> {
    let mut by_month: BTreeMap<String, i64> = BTreeMap::new();
    for entries in series {
        for entry in entries {
            *by_month.entry(entry.month.clone()).or_insert(0) += entry.count;
        }
    }
    by_month
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

/// Hosts as they enter aggregation: the rollup primary replaced by the
/// synthesized record, members dropped.
///
/// Members are dropped even when the primary is absent from the snapshot;
/// they are never priced on their own.
pub fn apply_rollup(hosts: &[Host], rollup: Option<&RegionalRollup>) -> PricingResult<Vec<Host>> {
    let Some(rollup) = rollup else {
        return Ok(hosts.to_vec());
    };
    if !hosts.iter().any(|h| h.slug == rollup.primary_slug) {
        tracing::debug!(rollup = %rollup.primary_slug, "rollup primary absent, dropping members only");
    }

    let mut out = Vec::with_capacity(hosts.len());
    for host in hosts {
        if host.slug == rollup.primary_slug {
            out.push(rollup.build(hosts)?);
        } else if !rollup.is_member(&host.slug) {
            out.push(host.clone());
        }
    }
    Ok(out)
}

/// Find a host by slug; the rollup alias resolves to the synthesized record
pub fn find_host(hosts: &[Host], slug: &str, rollup: Option<&RegionalRollup>) -> PricingResult<Option<Host>> {
    if let Some(rollup) = rollup.filter(|r| r.resolves(slug)) {
        return rollup.build(hosts).map(Some);
    }
    Ok(hosts.iter().find(|h| h.slug == slug).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(id: i64, slug: &str, months: &[(&str, i64)]) -> Host {
        let mut h = Host::new(id, slug);
        h.monthly_expenses = months
            .iter()
            .map(|(m, c)| MonthlyCount { month: m.to_string(), count: *c })
            .collect();
        h.monthly_active_collectives = h.monthly_expenses.clone();
        h.total_raised_crowdfunding_usd = 1_000;
        h.total_platform_tips = 10;
        h.total_host_fees_usd = 500;
        h
    }

    fn snapshot() -> Vec<Host> {
        vec![
            host(1, "europe", &[("2024-01", 5), ("2024-02", 5)]),
            host(2, "oce-foundation-usd", &[("2024-02", 1), ("2024-03", 2)]),
            host(3, "oce-foundation-eur", &[("2024-01", 4)]),
            host(4, "other", &[("2024-01", 9)]),
        ]
    }

    #[test]
    fn test_build_sums_series_and_totals() {
        let rollup = RegionalRollup::europe().build(&snapshot()).unwrap();

        assert_eq!(rollup.id, 1);
        assert_eq!(rollup.slug, "europe");
        assert_eq!(rollup.name, "Open Collective Europe (aggregate)");
        assert_eq!(
            rollup.monthly_expenses,
            vec![
                MonthlyCount { month: "2024-01".into(), count: 9 },
                MonthlyCount { month: "2024-02".into(), count: 6 },
                MonthlyCount { month: "2024-03".into(), count: 2 },
            ]
        );
        assert_eq!(rollup.total_raised_crowdfunding_usd, 3_000);
        assert_eq!(rollup.total_platform_tips, 30);
        assert_eq!(rollup.total_host_fees_usd, 1_500);
        assert!(rollup.tax_forms);
        assert!(rollup.automated_payouts);
    }

    #[test]
    fn test_apply_rollup_prices_group_once() {
        let hosts = apply_rollup(&snapshot(), Some(&RegionalRollup::europe())).unwrap();
        let slugs: Vec<_> = hosts.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["europe", "other"]);
        assert_eq!(hosts[0].total_raised_crowdfunding_usd, 3_000);
    }

    #[test]
    fn test_apply_rollup_without_primary() {
        let hosts: Vec<Host> = snapshot().into_iter().filter(|h| h.slug != "europe").collect();
        let out = apply_rollup(&hosts, Some(&RegionalRollup::europe())).unwrap();
        let slugs: Vec<_> = out.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["other"]);
        assert_eq!(apply_rollup(&hosts, None).unwrap().len(), 3);
    }

    #[test]
    fn test_find_host() {
        let hosts = snapshot();
        let rollup = RegionalRollup::europe();

        let oce = find_host(&hosts, "oce", Some(&rollup)).unwrap().unwrap();
        assert_eq!(oce.total_platform_tips, 30);

        let europe = find_host(&hosts, "europe", None).unwrap().unwrap();
        assert_eq!(europe.total_platform_tips, 10);

        let europe = find_host(&hosts, "europe", Some(&rollup)).unwrap().unwrap();
        assert_eq!(europe.total_platform_tips, 10);
        assert_eq!(europe.name, hosts[0].name);

        let member = find_host(&hosts, "oce-foundation-usd", Some(&rollup)).unwrap().unwrap();
        assert_eq!(member.id, 2);

        assert!(find_host(&hosts, "missing", Some(&rollup)).unwrap().is_none());
    }

    #[test]
    fn test_missing_primary_is_an_error() {
        let err = RegionalRollup::europe().build(&[]).unwrap_err();
        assert!(matches!(err, PricingError::InvalidHost(_)));
    }
}
