use colored::Colorize;
use gridbench_core::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    println!("{}", "▶ Launching sysbench...".green().bold());
    orchestrator.stress().await?;
    println!("{}", "✓ Stress run complete".green().bold());
    Ok(())
}
