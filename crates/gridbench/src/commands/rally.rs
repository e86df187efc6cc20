use colored::Colorize;
use gridbench_core::{DEFAULT_RALLY_DIRECTORY, Orchestrator, RallyOptions};

pub async fn handle(
    orchestrator: &Orchestrator,
    files: Vec<String>,
    directory: Option<String>,
    high: bool,
) -> anyhow::Result<()> {
    if files.is_empty() {
        let directory = directory.as_deref().unwrap_or(DEFAULT_RALLY_DIRECTORY);
        println!(
            "{}",
            format!("▶ Benchmarking with every scenario in '{directory}'...")
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!("▶ Benchmarking with scenarios: {}", files.join(", "))
                .green()
                .bold()
        );
    }
    if high {
        println!("  Mode: {}", "high (every database host)".cyan());
    }

    orchestrator
        .rally(RallyOptions {
            files,
            directory,
            high,
        })
        .await?;

    println!("{}", "✓ Benchmark complete".green().bold());
    Ok(())
}
