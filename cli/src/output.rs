//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use plansim_core::{format_amount, Cents};
use serde::{Deserialize, Serialize};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON/YAML, or run `table` for the human view
    pub fn print<T: Serialize>(&self, data: &T, table: impl FnOnce()) -> Result<(), String> {
        match self {
            OutputFormat::Json => {
                let text = serde_json::to_string_pretty(data).map_err(|e| e.to_string())?;
                println!("{}", text);
            }
            OutputFormat::Yaml => {
                let text = serde_yaml::to_string(data).map_err(|e| e.to_string())?;
                println!("{}", text);
            }
            OutputFormat::Table => table(),
        }
        Ok(())
    }
}

pub fn table<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn money(cents: Cents) -> String {
    format_amount(cents, 2)
}

/// Signed amount; red when the host pays more, green when it pays less
pub fn delta(cents: Cents) -> String {
    if cents > 0 {
        format!("+{}", money(cents)).red().to_string()
    } else if cents < 0 {
        money(cents).green().to_string()
    } else {
        money(cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_sign() {
        colored::control::set_override(false);
        assert_eq!(delta(150), "+$1.50");
        assert_eq!(delta(0), "$0");
        assert!(delta(-150).contains("1.50"));
    }
}
