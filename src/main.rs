//! jurisdiction-bootstrap - turns the OpenFisca country template into a
//! jurisdiction package at image build time.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use jurisdiction_bootstrap::config::Config;

#[derive(Parser)]
#[command(name = "jurisdiction-bootstrap")]
#[command(version, about = "Bootstrap an OpenFisca jurisdiction from the country template")]
#[command(
    after_help = "QUICK START:\n  JURISDICTION_NAME=Rules jurisdiction-bootstrap preflight\n  JURISDICTION_NAME=Rules jurisdiction-bootstrap plan\n  JURISDICTION_NAME=Rules jurisdiction-bootstrap run"
)]
struct Cli {
    /// Jurisdiction identifier (overrides JURISDICTION_NAME / COUNTRY_NAME)
    #[arg(long, global = true)]
    name: Option<String>,

    /// Template tree (overrides TEMPLATE_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the template, rename the package and install it
    Run {
        /// Also rename the tree root to openfisca-<name>
        #[arg(long)]
        relocate: bool,
        /// Skip the editable install
        #[arg(long)]
        no_install: bool,
    },

    /// Show what `run` would change, without changing anything
    Plan {
        /// Include the root relocation in the plan
        #[arg(long)]
        relocate: bool,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Retry only the install step on an already-transformed tree
    Install,

    /// Run preflight checks (verify the template before transforming)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show the names derived from an identifier
    Names {
        /// Identifier to derive from (default: configured jurisdiction)
        identifier: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_dir = std::env::current_dir().context("Cannot determine working directory")?;

    // .env first, then the process environment
    let mut config = Config::load(&base_dir);
    if let Some(name) = cli.name {
        config.jurisdiction = Some(name);
        config.jurisdiction_var = Some("--name");
    }
    if let Some(root) = cli.root {
        config.template_root = base_dir.join(root);
    }

    match cli.command {
        Commands::Run {
            relocate,
            no_install,
        } => commands::cmd_run(&config, relocate, no_install)?,

        Commands::Plan { relocate, json } => commands::cmd_plan(&config, relocate, json)?,

        Commands::Install => commands::cmd_install(&config)?,

        Commands::Preflight { strict } => commands::cmd_preflight(&config, strict)?,

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Names { identifier } => {
                    commands::show::ShowTarget::Names { identifier }
                }
            };
            commands::cmd_show(&config, show_target)?;
        }
    }

    Ok(())
}
