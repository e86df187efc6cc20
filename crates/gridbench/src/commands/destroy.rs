use colored::Colorize;
use gridbench_core::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    println!("{}", "▶ Destroying deployed units...".yellow().bold());
    orchestrator.destroy().await?;
    println!("{}", "✓ Deployed units removed".green().bold());
    Ok(())
}
