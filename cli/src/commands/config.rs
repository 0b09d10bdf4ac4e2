//! Config commands

use crate::config::Config;

/// Write a default configuration file for the profile
pub fn init(profile: Option<&str>, force: bool) -> Result<(), String> {
    let path = Config::config_path(profile)?;
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()));
    }
    Config::default().save_to(&path)?;
    println!("Configuration initialized at {}", path.display());
    Ok(())
}

/// Print the effective configuration, flags applied
pub fn show(config: &Config) -> Result<(), String> {
    print!("{}", config.to_toml()?);
    Ok(())
}
