//! Plan Simulator Core
//!
//! Pricing engine for hosting subscriptions: picks the cheapest tier for a
//! usage profile, compares a host's legacy percentage fees with a tier plan
//! and projects platform revenue across every host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          PLAN SIMULATOR                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       INGESTION                                  │   │
//! │  │   Snapshot JSON ─► HostRecord ─► Host ─► Regional Rollup          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐ │
//! │  │    Tier      │  │    Usage     │  │    Tier      │  │    Fee      │ │
//! │  │   Catalog    │  │   Metrics    │  │   Selector   │  │ Comparator  │ │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └─────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   REVENUE AGGREGATOR                             │   │
//! │  │   Per-host monthly fees ─► x12 ─► Before / After totals          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All money is integer cents. Host-specific contractual exceptions live in
//! an [`ExceptionTable`] passed with the [`SimulatorConfig`].

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod exceptions;
pub mod fees;
pub mod host;
pub mod metrics;
pub mod money;
pub mod revenue;
pub mod rollup;
pub mod selector;

pub use catalog::{PricingModel, Tier, TierCatalog, TierType, ALT_MODEL_TIER_SET, DEFAULT_TIER_SET};
pub use config::SimulatorConfig;
pub use error::{PricingError, PricingResult};
pub use exceptions::{ExceptionTable, HostOverride};
pub use fees::{calculate_fees, plan_summary, FeeBreakdown, FeeSide, Interval, PlanSummary, SelectedPlan};
pub use host::{load_snapshot, parse_snapshot, Host, HostRecord, MonthlyCount};
pub use metrics::{derive_metrics, UsageMetrics};
pub use money::{format_amount, Cents};
pub use revenue::{aggregate_revenue, aggregate_revenue_by_set, price_host, ProjectedRevenue, RevenueTotals};
pub use rollup::{apply_rollup, find_host, RegionalRollup};
pub use selector::{best_tier_per_type, quote_tier, select_best_tier, TierQuote, Usage, MAX_USAGE_UNITS};
