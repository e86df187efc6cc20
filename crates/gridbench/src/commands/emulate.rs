use colored::Colorize;
use gridbench_core::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    println!("{}", "▶ Applying network constraints...".green().bold());
    orchestrator.emulate(None).await?;
    println!("{}", "✓ Network constraints applied".green().bold());
    Ok(())
}
