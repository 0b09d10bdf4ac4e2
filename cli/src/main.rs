//! Plan Simulator CLI
//!
//! Command-line front end for the hosting plan simulator.
//!
//! # Usage
//!
//! ```bash
//! plansim tiers --set alt-model
//! plansim recommend --expenses 40 --collectives 12 --automated-payouts
//! plansim --snapshot hosts.json compare opensource --interval yearly
//! plansim --snapshot hosts.json revenue --format json
//! plansim config init
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use plansim_core::Interval;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "plansim")]
#[command(version)]
#[command(about = "Hosting plan simulator and fee comparison", long_about = None)]
struct Cli {
    /// Host snapshot file (JSON)
    #[arg(long, env = "PLANSIM_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Profile name from config file
    #[arg(long, short = 'p', env = "PLANSIM_PROFILE")]
    config_profile: Option<String>,

    /// Output format
    #[arg(long, short, env = "PLANSIM_FORMAT")]
    format: Option<output::OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tier catalog
    Tiers {
        /// Tier set id (all sets when omitted)
        #[arg(long)]
        set: Option<String>,
    },
    /// Recommend a tier for a usage profile
    Recommend {
        /// Paid expenses per month
        #[arg(long)]
        expenses: i64,
        /// Active collectives per month
        #[arg(long)]
        collectives: i64,
        #[arg(long)]
        automated_payouts: bool,
        #[arg(long)]
        tax_forms: bool,
        #[arg(long)]
        set: Option<String>,
        #[arg(long, value_enum, default_value = "monthly")]
        interval: IntervalArg,
    },
    /// Compare a host's current fees with its best tier
    Compare {
        /// Host slug
        slug: String,
        #[arg(long)]
        set: Option<String>,
        #[arg(long, value_enum, default_value = "monthly")]
        interval: IntervalArg,
    },
    /// Project platform revenue before and after the tier model
    Revenue {
        /// Tier set id (all sets when omitted)
        #[arg(long)]
        set: Option<String>,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntervalArg {
    Monthly,
    Yearly,
}

impl From<IntervalArg> for Interval {
    fn from(arg: IntervalArg) -> Self {
        match arg {
            IntervalArg::Monthly => Interval::Monthly,
            IntervalArg::Yearly => Interval::Yearly,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<config::Config, String> {
    let mut config = config::Config::load(cli.config_profile.as_deref())?;
    if cli.snapshot.is_some() {
        config.simulator.snapshot_path = cli.snapshot.clone();
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), String> {
    if let Commands::Config { action: ConfigCommands::Init { force } } = cli.command {
        return commands::config::init(cli.config_profile.as_deref(), force);
    }

    let config = load_config(&cli)?;
    let format = cli.format.or(config.default_format).unwrap_or_default();
    let ctx = commands::Context::new(config.simulator.clone(), format)?;

    match cli.command {
        Commands::Tiers { set } => commands::tiers::handle(&ctx, set.as_deref()),
        Commands::Recommend { expenses, collectives, automated_payouts, tax_forms, set, interval } => {
            let usage = plansim_core::Usage { expenses, collectives, automated_payouts, tax_forms };
            commands::recommend::handle(&ctx, usage, set.as_deref(), interval.into())
        }
        Commands::Compare { slug, set, interval } => {
            commands::compare::handle(&ctx, &slug, set.as_deref(), interval.into())
        }
        Commands::Revenue { set } => commands::revenue::handle(&ctx, set.as_deref()),
        Commands::Config { .. } => commands::config::show(&config),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
