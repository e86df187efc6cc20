use colored::Colorize;
use gridbench_core::Orchestrator;

pub async fn handle(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    println!("{}", "▶ Deploying OpenStack Keystone...".green().bold());
    orchestrator.openstack().await?;
    println!("{}", "✓ OpenStack deployed".green().bold());
    Ok(())
}
