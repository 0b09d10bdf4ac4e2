//! Error types for the pricing simulator

use thiserror::Error;

/// Pricing simulator error type
#[derive(Error, Debug)]
pub enum PricingError {
    /// No tier in the set is eligible for the host's feature flags.
    ///
    /// This is a catalog misconfiguration: picking an arbitrary tier instead
    /// would silently misprice the host.
    #[error("no eligible tier in set {tier_set:?} (tax_forms={tax_forms}, automated_payouts={automated_payouts})")]
    NoEligibleTier {
        /// Tier set that was searched
        tier_set: String,
        /// Host requires tax form support
        tax_forms: bool,
        /// Host uses automated payouts
        automated_payouts: bool,
    },

    /// Usage profile outside the range the simulator prices
    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    /// Tier set id not present in the catalog
    #[error("unknown tier set: {0}")]
    UnknownTierSet(String),

    /// Month label is not `YYYY-MM`
    #[error("invalid month label: {0}")]
    InvalidMonth(String),

    /// Host record cannot be ingested
    #[error("invalid host record: {0}")]
    InvalidHost(String),

    /// Snapshot could not be decoded
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type for the pricing simulator
pub type PricingResult<T> = Result<T, PricingError>;
