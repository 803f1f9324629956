mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use kubealias::{
    rename::validate_alias,
    settings::{self, Settings},
    version::{self, ClientVersion},
    Invocation, OutputFormat,
};

/// Set a short cluster name for GCP/GKE clusters
#[derive(Parser, Debug)]
#[command(name = "gke-alias")]
struct Args {
    /// Settings file (default is $HOME/.gke-alias/config.yml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get the current context from KUBECONFIG
    ///
    /// With no flags both values are printed, e.g.
    /// {"clusterAlias": "nonprod-gke-dev1", "clusterName": "gke_nonprod-gke_us-east1_nonprod-gke-dev1"}
    Get {
        /// Show the alias value
        #[arg(short, long)]
        alias: bool,
        /// Show the cluster full name
        #[arg(short, long)]
        name: bool,
        /// Show values in RAW format
        #[arg(short, long)]
        raw: bool,
    },
    /// Set the alias for the current context
    Set {
        /// New alias for the current-context
        #[arg(short, long, value_parser = parse_alias)]
        alias: String,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Express the version of gke-alias
    #[command(visible_alias = "v")]
    Version,
}

fn parse_alias(value: &str) -> Result<String, kubealias::Error> {
    validate_alias(value)?;
    Ok(value.to_owned())
}

fn run(command: Command) -> anyhow::Result<String> {
    match command {
        Command::Get { alias, name, raw } => Invocation::from_env(false)
            .and_then(|inv| inv.get(OutputFormat { alias, name, raw }))
            .context("Error getting the current context"),
        Command::Set { alias, verbose } => Invocation::from_env(verbose)
            .and_then(|inv| inv.set(&alias))
            .context("Error setting the alias for the current-context"),
        Command::Version => Ok(version::render(ClientVersion::current())?),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let settings_path = settings::bootstrap(args.config.as_deref(), dirs::home_dir().as_deref());
    let settings = settings_path
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    let verbose = matches!(args.command, Command::Set { verbose: true, .. });
    let directive = if verbose {
        "info"
    } else {
        settings.log_level.as_deref().unwrap_or("warn")
    };
    if let Err(err) = logging::init(directive) {
        eprintln!("could not initialise logging: {err:#}");
    }

    if let Err(err) = settings_path {
        tracing::error!("{err}");
        return ExitCode::FAILURE;
    }

    match run(args.command) {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
