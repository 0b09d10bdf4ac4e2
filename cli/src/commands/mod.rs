//! CLI Commands

pub mod compare;
pub mod config;
pub mod recommend;
pub mod revenue;
pub mod tiers;

use plansim_core::{load_snapshot, Host, SimulatorConfig, Tier, TierCatalog};

use crate::output::OutputFormat;

/// What every command runs against
pub struct Context {
    pub config: SimulatorConfig,
    pub catalog: TierCatalog,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: SimulatorConfig, format: OutputFormat) -> Result<Self, String> {
        let catalog = TierCatalog::new();
        config.validate(&catalog).map_err(|e| e.to_string())?;
        Ok(Self { config, catalog, format })
    }

    /// Tiers of `set`, or of the configured default set
    pub fn tier_set(&self, set: Option<&str>) -> Result<Vec<Tier>, String> {
        let id = set.unwrap_or(&self.config.default_tier_set);
        self.catalog.tier_set(id).map_err(|e| e.to_string())
    }

    pub fn hosts(&self) -> Result<Vec<Host>, String> {
        let path = self
            .config
            .snapshot_path
            .as_ref()
            .ok_or("No snapshot configured (use --snapshot or snapshot_path in the config file)")?;
        load_snapshot(path).map_err(|e| e.to_string())
    }
}
