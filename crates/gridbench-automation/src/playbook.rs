//! ansible-playbook CLI wrapper
//!
//! Automation units are externally-authored playbooks. Unit `foo` resolves to
//! `<playbook_dir>/foo.yml` and parameters travel as one JSON `--extra-vars`
//! argument. The orchestrator consumes nothing beyond success/failure and the
//! captured log.

use crate::error::{AutomationError, Result};
use async_trait::async_trait;
use gridbench_core::{Automation, ExtraVars, Report};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const DEFAULT_PROGRAM: &str = "ansible-playbook";

pub struct PlaybookRunner {
    playbook_dir: PathBuf,
    program: String,
}

impl PlaybookRunner {
    pub fn new(playbook_dir: impl Into<PathBuf>) -> Self {
        Self {
            playbook_dir: playbook_dir.into(),
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Use a different executable, e.g. a pinned ansible-playbook path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn unit_path(&self, unit: &str) -> PathBuf {
        self.playbook_dir.join(format!("{unit}.yml"))
    }

    async fn run(&self, unit: &str, inventory: Option<&Path>, vars: &ExtraVars) -> Result<Report> {
        let playbook = self.unit_path(unit);
        if !playbook.is_file() {
            return Err(AutomationError::UnitNotFound(playbook));
        }

        let extra_vars = serde_json::to_string(vars)?;

        let mut cmd = Command::new(&self.program);
        if let Some(inventory) = inventory {
            cmd.arg("--inventory").arg(inventory);
        }
        cmd.arg("--extra-vars").arg(&extra_vars);
        cmd.arg(&playbook);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            unit,
            "running: {} --extra-vars {} {}",
            self.program,
            extra_vars,
            playbook.display()
        );

        let output = cmd.output().await?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(Report {
            ok: output.status.success(),
            log,
        })
    }
}

#[async_trait]
impl Automation for PlaybookRunner {
    async fn apply(
        &self,
        unit: &str,
        inventory: Option<&Path>,
        vars: &ExtraVars,
    ) -> gridbench_core::Result<Report> {
        Ok(self.run(unit, inventory, vars).await?)
    }
}
