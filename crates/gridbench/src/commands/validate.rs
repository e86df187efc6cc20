use colored::Colorize;
use gridbench_core::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    println!("{}", "▶ Validating network connectivity...".green().bold());
    orchestrator.validate().await?;
    println!("{}", "✓ Network validated".green().bold());
    Ok(())
}
