use colored::Colorize;
use gridbench_core::{Environment, Orchestrator};
use std::path::PathBuf;

const SUPPORTED_FORMATS: &str = "text, json, yaml";

pub async fn handle(
    orchestrator: &Orchestrator,
    env_dir: Option<PathBuf>,
    out: &str,
) -> anyhow::Result<()> {
    let env = orchestrator.inspect(env_dir.as_deref()).await?;

    match out {
        "text" => print_text(&env),
        "json" => println!("{}", serde_json::to_string_pretty(&env)?),
        "yaml" => print!("{}", serde_yaml::to_string(&env)?),
        other => {
            // Not fatal: report and leave the process exit untouched.
            eprintln!(
                "{}",
                format!("⚠ --out does not support the '{other}' format").yellow()
            );
            eprintln!("supported formats: {SUPPORTED_FORMATS}");
        }
    }
    Ok(())
}

fn print_text(env: &Environment) {
    println!("{}", "Deployment state".bold());
    println!("  database:   {}", env.db.cyan());
    println!("  monitoring: {}", env.monitoring);
    if let Some(provider) = &env.provider {
        println!("  provider:   {}", provider.cyan());
    }
    if let Some(dir) = &env.result_dir {
        println!("  result dir: {}", dir.display());
    }
    if let Some(inventory) = &env.inventory {
        println!("  inventory:  {}", inventory.display());
    }
    if let Some(latency) = &env.latency {
        println!("  latency:    {latency}");
    }

    if env.roles.is_empty() {
        println!("  roles:      {}", "(not provisioned)".dimmed());
    } else {
        println!("  roles:");
        for (role, hosts) in &env.roles {
            println!("    {} ({} hosts)", role.cyan(), hosts.len());
            for host in hosts {
                println!("      • {}", host.address);
            }
        }
    }

    if !env.rally_nodes.is_empty() {
        println!("  benchmark targets:");
        for host in &env.rally_nodes {
            println!("      • {}", host.address);
        }
    }

    if !env.completed.is_empty() {
        let completed: Vec<&str> = env.completed.iter().map(String::as_str).collect();
        println!("  completed stages: {}", completed.join(", "));
    }
}
