//! Process-level wiring
//!
//! Resolves the state and playbook directories and assembles the
//! orchestrator with the concrete gateway adapters.

use gridbench_automation::{PlaybookRunner, TcEmulator};
use gridbench_core::{EnvStore, Gateways, Orchestrator};
use gridbench_provision::{IniInventory, Providers};
use std::path::PathBuf;

pub const HOME_ENV: &str = "GRIDBENCH_HOME";
pub const PLAYBOOKS_ENV: &str = "GRIDBENCH_PLAYBOOKS";

const DEFAULT_HOME: &str = ".gridbench";
const DEFAULT_PLAYBOOKS: &str = "playbooks";

/// State directory: `$GRIDBENCH_HOME`, or `./.gridbench`.
pub fn home_dir() -> PathBuf {
    std::env::var_os(HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME))
}

/// Playbook directory: `$GRIDBENCH_PLAYBOOKS`, or `./playbooks`.
pub fn playbook_dir() -> PathBuf {
    std::env::var_os(PLAYBOOKS_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PLAYBOOKS))
}

pub fn orchestrator() -> Orchestrator {
    let home = home_dir();
    tracing::debug!(home = %home.display(), "using state directory");

    let store = EnvStore::new(home);
    let gateways = Gateways {
        providers: Box::new(Providers),
        inventory: Box::new(IniInventory),
        automation: Box::new(PlaybookRunner::new(playbook_dir())),
        netem: Box::new(TcEmulator::new(PlaybookRunner::new(playbook_dir()))),
    };
    Orchestrator::new(store, gateways)
}
