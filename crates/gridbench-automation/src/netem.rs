//! Network emulation
//!
//! Traffic shaping is applied by the `netem` automation unit against the
//! rendered inventory; connectivity checks go through the `netcheck` unit.
//! The constraint spec is handed over as `tc_*` extra-vars.

use crate::playbook::PlaybookRunner;
use async_trait::async_trait;
use gridbench_core::{Automation, Error, ExtraVars, NetemSpec, NetworkEmulator, Roles};
use serde_json::json;
use std::path::Path;

pub const NETEM_UNIT: &str = "netem";
pub const NETCHECK_UNIT: &str = "netcheck";

pub struct TcEmulator {
    runner: PlaybookRunner,
}

impl TcEmulator {
    pub fn new(runner: PlaybookRunner) -> Self {
        Self { runner }
    }

    fn constraint_vars(spec: &NetemSpec) -> ExtraVars {
        let mut vars = ExtraVars::new();
        vars.insert("tc_enable".to_string(), json!(spec.enable));
        vars.insert("tc_default_delay".to_string(), json!(spec.default_delay));
        vars.insert("tc_default_rate".to_string(), json!(spec.default_rate));
        vars.insert("tc_constraints".to_string(), json!(spec.constraints));
        vars.insert("tc_groups".to_string(), json!(spec.groups));
        vars
    }

    async fn run_unit(
        &self,
        unit: &str,
        inventory: &Path,
        vars: ExtraVars,
    ) -> gridbench_core::Result<()> {
        let report = self.runner.apply(unit, Some(inventory), &vars).await?;
        if !report.ok {
            return Err(Error::Automation {
                unit: unit.to_string(),
                log: report.log,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NetworkEmulator for TcEmulator {
    async fn emulate(
        &self,
        _roles: &Roles,
        inventory: &Path,
        spec: &NetemSpec,
    ) -> gridbench_core::Result<()> {
        tracing::info!(
            constraints = spec.constraints.len(),
            default_delay = spec.default_delay.as_str(),
            "applying network constraints"
        );
        self.run_unit(NETEM_UNIT, inventory, Self::constraint_vars(spec))
            .await
    }

    async fn validate(&self, _roles: &Roles, inventory: &Path) -> gridbench_core::Result<()> {
        self.run_unit(NETCHECK_UNIT, inventory, ExtraVars::new())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn constraint_vars_carry_the_whole_spec() {
        let vars = TcEmulator::constraint_vars(&NetemSpec::default());
        assert_eq!(vars.get("tc_enable"), Some(&json!(true)));
        assert_eq!(vars.get("tc_default_delay"), Some(&json!("0ms")));
        assert_eq!(vars.get("tc_default_rate"), Some(&json!("10gbit")));
        assert_eq!(vars.get("tc_groups"), Some(&json!(["database"])));
        let constraints = vars.get("tc_constraints").unwrap();
        assert_eq!(constraints[0]["network"], json!("database_network"));
    }

    #[tokio::test]
    async fn emulate_fails_when_the_unit_reports_failure() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("netem.yml"), "---\n").unwrap();
        let inventory = dir.path().join("hosts");
        std::fs::write(&inventory, "").unwrap();

        let emulator = TcEmulator::new(PlaybookRunner::new(dir.path()).with_program("false"));
        let err = emulator
            .emulate(&Roles::new(), &inventory, &NetemSpec::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Automation { .. }));
    }

    #[tokio::test]
    async fn validate_runs_the_netcheck_unit() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("netcheck.yml"), "---\n").unwrap();
        let inventory = dir.path().join("hosts");
        std::fs::write(&inventory, "").unwrap();

        let emulator = TcEmulator::new(PlaybookRunner::new(dir.path()).with_program("true"));
        emulator.validate(&Roles::new(), &inventory).await.unwrap();
    }
}
