//! Storefront cache tool - inspect and reset the local sync cache.

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use storefront_config::{init_logging, Config, Paths};

/// Storefront cache command-line interface.
#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Inspect and reset the local storefront cache")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for the cache and config. Defaults to ~/.storefront
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record counts per kind
    Stats,
    /// List cached orders of a site
    Orders {
        #[arg(long)]
        site: i64,
    },
    /// List cached products of a site
    Products {
        #[arg(long)]
        site: i64,
    },
    /// List cached coupons of a site
    Coupons {
        #[arg(long)]
        site: i64,
    },
    /// Delete cached records
    Reset {
        /// Only this kind. Everything when omitted.
        #[arg(long, value_enum)]
        kind: Option<Kind>,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Kind {
    Orders,
    Products,
    Coupons,
    Refunds,
    AttributeTerms,
    Stats,
    Shipments,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new().context("resolving cache directory")?,
    };
    let config = Config::load(&paths).context("loading configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, config.log_format);

    match cli.command {
        Commands::Stats => commands::stats(&config, &paths)?,
        Commands::Orders { site } => commands::list_orders(&config, &paths, site)?,
        Commands::Products { site } => commands::list_products(&config, &paths, site)?,
        Commands::Coupons { site } => commands::list_coupons(&config, &paths, site)?,
        Commands::Reset { kind } => commands::reset(&config, &paths, kind).await?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Init => {
                Config::default()
                    .save(&paths)
                    .context("writing configuration")?;
                println!("{}", paths.config_file().display());
            }
        },
    }

    Ok(())
}
