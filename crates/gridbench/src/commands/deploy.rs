use colored::Colorize;
use gridbench_core::{ConfigInput, DEFAULT_DEPLOY_TAGS, DeployOptions, Orchestrator};
use std::path::PathBuf;

pub async fn handle(
    orchestrator: &Orchestrator,
    conf: PathBuf,
    provider: String,
    force_deployment: bool,
    xp_name: Option<String>,
    tags: Vec<String>,
) -> anyhow::Result<()> {
    let tags = if tags.is_empty() {
        DEFAULT_DEPLOY_TAGS.iter().map(|s| s.to_string()).collect()
    } else {
        tags
    };

    println!("{}", "▶ Deploying...".green().bold());
    println!("  Config:   {}", conf.display().to_string().cyan());
    println!("  Provider: {}", provider.cyan());
    println!("  Stages:   {}", tags.join(", ").cyan());

    orchestrator
        .deploy(DeployOptions {
            config: ConfigInput::Path(conf),
            provider,
            force_deployment,
            name: xp_name,
            tags,
        })
        .await?;

    println!("{}", "✓ Deployment complete".green().bold());
    Ok(())
}
