mod export;
mod scan;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dsstock")]
#[command(about = "DS Automobiles European stock monitor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan every registered storefront and report stock
    Scan {
        /// Site registry file (defaults to `DSSTOCK_SITES_PATH`)
        #[arg(long)]
        sites: Option<PathBuf>,
        /// Output directory (defaults to `DS_Stocks_Europe_<date>`)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print results without writing export files
        #[arg(long)]
        no_export: bool,
        /// Restrict the scan to one country; repeatable
        #[arg(long = "country")]
        countries: Vec<String>,
    },
    /// List registered storefronts and their extraction strategy
    Sites {
        /// Site registry file (defaults to `DSSTOCK_SITES_PATH`)
        #[arg(long)]
        sites: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = dsstock_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Scan {
            sites,
            out,
            no_export,
            countries,
        }) => {
            let args = scan::ScanArgs {
                sites,
                out,
                no_export,
                countries,
            };
            scan::run_scan_command(&config, args).await?;
        }
        Some(Commands::Sites { sites }) => {
            scan::run_list_sites(&config, sites.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
