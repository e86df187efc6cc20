mod commands;
mod context;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridbench")]
#[command(version)]
#[command(about = "Deploy a database + OpenStack stack on a testbed and benchmark it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Claim resources from a provider and configure them
    Deploy {
        /// Path to the configuration file describing the deployment
        #[arg(long, default_value = "conf.yaml")]
        conf: PathBuf,
        /// Provider to target
        #[arg(long, default_value = "static")]
        provider: String,
        /// Force the provider to redo the deployment
        #[arg(long)]
        force_deployment: bool,
        /// Name of the deployment (defaults to a shared one)
        #[arg(long)]
        xp_name: Option<String>,
        /// Only run the stages matching these tags
        #[arg(long, num_args = 1..)]
        tags: Vec<String>,
    },
    /// Add OpenStack Keystone to the deployment
    Openstack,
    /// Launch sysbench tests against the deployed database
    Stress,
    /// Benchmark OpenStack with rally scenarios
    Rally {
        /// Scenario files to run (paths inside the rally scenarios folder)
        #[arg(long, num_args = 1.., conflicts_with = "directory")]
        files: Vec<String>,
        /// Directory containing the rally scenarios
        #[arg(long)]
        directory: Option<String>,
        /// Run rally on every database host instead of the designated one
        #[arg(long)]
        high: bool,
    },
    /// Emulate network constraints between role groups
    Emulate,
    /// Validate network connectivity across the declared networks
    Validate,
    /// Backup the deployment
    Backup {
        /// Backup directory
        #[arg(long)]
        backup_dir: Option<PathBuf>,
    },
    /// Destroy the deployed units (the claimed resources survive)
    Destroy,
    /// Show the state of the active deployment
    Info {
        /// Path to a deployment directory to inspect
        #[arg(short = 'e', long)]
        env: Option<PathBuf>,
        /// Output format: text, json or yaml
        #[arg(long, default_value = "text")]
        out: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let orchestrator = context::orchestrator();

    match cli.command {
        Commands::Deploy {
            conf,
            provider,
            force_deployment,
            xp_name,
            tags,
        } => {
            commands::deploy::handle(&orchestrator, conf, provider, force_deployment, xp_name, tags)
                .await?;
        }
        Commands::Openstack => {
            commands::openstack::handle(&orchestrator).await?;
        }
        Commands::Stress => {
            commands::stress::handle(&orchestrator).await?;
        }
        Commands::Rally {
            files,
            directory,
            high,
        } => {
            commands::rally::handle(&orchestrator, files, directory, high).await?;
        }
        Commands::Emulate => {
            commands::emulate::handle(&orchestrator).await?;
        }
        Commands::Validate => {
            commands::validate::handle(&orchestrator).await?;
        }
        Commands::Backup { backup_dir } => {
            commands::backup::handle(&orchestrator, backup_dir).await?;
        }
        Commands::Destroy => {
            commands::destroy::handle(&orchestrator).await?;
        }
        Commands::Info { env, out } => {
            commands::info::handle(&orchestrator, env, &out).await?;
        }
    }

    Ok(())
}
