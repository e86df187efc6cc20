use colored::Colorize;
use gridbench_core::Orchestrator;
use std::path::PathBuf;

pub async fn handle(orchestrator: &Orchestrator, backup_dir: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "▶ Backing up the deployment...".green().bold());
    let dir = orchestrator.backup(backup_dir).await?;
    println!(
        "{}",
        format!("✓ Backup written to {}", dir.display())
            .green()
            .bold()
    );
    Ok(())
}
