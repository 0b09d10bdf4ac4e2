//! Host records and the snapshot ingestion boundary
//!
//! The external data source (a cached JSON snapshot or a live ledger query)
//! produces loosely-typed records. They are converted once, here, into the
//! strictly-typed [`Host`]; every defaulting rule for missing data lives in
//! this module so the computation never has to guess.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PricingError, PricingResult};
use crate::money::{apply_rate, Cents};

/// Count for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    /// Number of items in that month
    pub count: i64,
}

impl MonthlyCount {
    /// Create a count, validating the month label
    pub fn new(month: impl Into<String>, count: i64) -> PricingResult<Self> {
        let month = month.into();
        parse_month(&month)?;
        Ok(Self { month, count })
    }
}

/// Parse a `YYYY-MM` label to the first day of that month
pub fn parse_month(label: &str) -> PricingResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d")
        .map_err(|_| PricingError::InvalidMonth(label.to_string()))
}

/// An account hosted on the platform; the unit of billing.
///
/// Monetary totals cover the trailing twelve months, in USD cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Ledger account id
    pub id: i64,
    /// Unique handle
    pub slug: String,
    /// Display name
    pub name: String,
    /// Paid expenses per month, ordered by month; absent months are missing
    pub monthly_expenses: Vec<MonthlyCount>,
    /// Active hosted collectives per month, same shape
    pub monthly_active_collectives: Vec<MonthlyCount>,
    /// Raised through crowdfunding contributions
    #[serde(rename = "totalRaisedCrowdfundingUSD")]
    pub total_raised_crowdfunding_usd: Cents,
    /// Raised through every other channel
    #[serde(rename = "totalRaisedNonCrowdfundingUSD")]
    pub total_raised_non_crowdfunding_usd: Cents,
    /// Host fees the host charged its collectives
    #[serde(rename = "totalHostFeesUSD")]
    pub total_host_fees_usd: Cents,
    /// Part of `total_host_fees_usd` charged on crowdfunding
    #[serde(rename = "totalHostFeesCrowdfundingUSD")]
    pub total_host_fees_crowdfunding_usd: Cents,
    /// Voluntary contributions to the platform
    pub total_platform_tips: Cents,
    /// Collectives hosted, active or not
    pub total_collectives: i64,
    /// Host pays expenses through automated payouts
    pub automated_payouts: bool,
    /// Host collects tax forms
    pub tax_forms: bool,
    /// Percentage the host charges its own collectives
    pub host_fee_percent: Decimal,
}

impl Host {
    /// Empty host record; convenient base for builders and tests
    pub fn new(id: i64, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            id,
            name: slug.clone(),
            slug,
            monthly_expenses: Vec::new(),
            monthly_active_collectives: Vec::new(),
            total_raised_crowdfunding_usd: 0,
            total_raised_non_crowdfunding_usd: 0,
            total_host_fees_usd: 0,
            total_host_fees_crowdfunding_usd: 0,
            total_platform_tips: 0,
            total_collectives: 0,
            automated_payouts: false,
            tax_forms: false,
            host_fee_percent: Decimal::ZERO,
        }
    }
}

/// Host record as it appears in the snapshot file.
///
/// Every field is optional; see [`Host::try_from`] for the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct HostRecord {
    pub id: Option<i64>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub monthly_expenses: Option<Vec<MonthlyCount>>,
    pub monthly_active_collectives: Option<Vec<MonthlyCount>>,
    #[serde(rename = "totalRaisedCrowdfundingUSD")]
    pub total_raised_crowdfunding_usd: Option<Cents>,
    #[serde(rename = "totalRaisedNonCrowdfundingUSD")]
    pub total_raised_non_crowdfunding_usd: Option<Cents>,
    #[serde(rename = "totalHostFeesUSD")]
    pub total_host_fees_usd: Option<Cents>,
    #[serde(rename = "totalHostFeesCrowdfundingUSD")]
    pub total_host_fees_crowdfunding_usd: Option<Cents>,
    pub total_platform_tips: Option<Cents>,
    pub total_collectives: Option<i64>,
    pub automated_payouts: Option<bool>,
    pub tax_forms: Option<bool>,
    pub host_fee_percent: Option<Decimal>,
}

impl TryFrom<HostRecord> for Host {
    type Error = PricingError;

    fn try_from(record: HostRecord) -> PricingResult<Self> {
        let slug = record
            .slug
            .filter(|s| !s.is_empty())
            .ok_or_else(|| PricingError::InvalidHost("missing slug".into()))?;
        let id = record
            .id
            .ok_or_else(|| PricingError::InvalidHost(format!("{slug}: missing id")))?;

        let host_fee_percent = record.host_fee_percent.unwrap_or(Decimal::ZERO);
        let raised_crowdfunding = record.total_raised_crowdfunding_usd.unwrap_or(0);
        let raised_non_crowdfunding = record.total_raised_non_crowdfunding_usd.unwrap_or(0);

        let (total_host_fees_usd, total_host_fees_crowdfunding_usd) =
            match (record.total_host_fees_usd, record.total_host_fees_crowdfunding_usd) {
                (Some(total), crowdfunding) => (total, crowdfunding.unwrap_or(0)),
                (None, _) => {
                    // Older snapshots carry no host fee totals; estimate them
                    // from what the host raised and its own fee percentage.
                    let rate = host_fee_percent / Decimal::from(100);
                    let crowdfunding = apply_rate(raised_crowdfunding, rate);
                    let non_crowdfunding = apply_rate(raised_non_crowdfunding, rate);
                    tracing::warn!(
                        host = %slug,
                        %host_fee_percent,
                        "host fee totals missing, estimated from hostFeePercent"
                    );
                    (crowdfunding + non_crowdfunding, crowdfunding)
                }
            };

        Ok(Self {
            id,
            name: record.name.unwrap_or_else(|| slug.clone()),
            monthly_expenses: normalize_series(record.monthly_expenses.unwrap_or_default())?,
            monthly_active_collectives: normalize_series(
                record.monthly_active_collectives.unwrap_or_default(),
            )?,
            slug,
            total_raised_crowdfunding_usd: raised_crowdfunding,
            total_raised_non_crowdfunding_usd: raised_non_crowdfunding,
            total_host_fees_usd,
            total_host_fees_crowdfunding_usd,
            total_platform_tips: record.total_platform_tips.unwrap_or(0),
            total_collectives: record.total_collectives.unwrap_or(0),
            automated_payouts: record.automated_payouts.unwrap_or(false),
            tax_forms: record.tax_forms.unwrap_or(false),
            host_fee_percent,
        })
    }
}

/// Validate month labels and order the series by month
fn normalize_series(mut series: Vec<MonthlyCount>) -> PricingResult<Vec<MonthlyCount>> {
    for entry in &series {
        parse_month(&entry.month)?;
    }
    // Labels are zero-padded, so lexical order is calendar order.
    series.sort_by(|a, b| a.month.cmp(&b.month));
    Ok(series)
}

/// Decode a snapshot (JSON array of host records)
pub fn parse_snapshot(json: &str) -> PricingResult<Vec<Host>> {
    let records: Vec<HostRecord> = serde_json::from_str(json)?;
    records.into_iter().map(Host::try_from).collect()
}

/// Load a snapshot file.
///
/// A missing file yields an empty host list: the snapshot may simply not
/// have been fetched yet.
pub fn load_snapshot(path: impl AsRef<Path>) -> PricingResult<Vec<Host>> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "snapshot file not found, no hosts loaded");
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let hosts = parse_snapshot(&content)?;
    tracing::info!(path = %path.display(), hosts = hosts.len(), "snapshot loaded");
    Ok(hosts)
}
