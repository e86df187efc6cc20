//! Gateway contracts
//!
//! Resource provisioning, inventory rendering, automation-unit execution and
//! network emulation are delegated to external systems. The orchestrator only
//! depends on the traits below; the adapter crates provide implementations.

use crate::error::Result;
use crate::model::{NetemSpec, Network, Roles};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Parameter map handed to an automation unit.
pub type ExtraVars = Map<String, Value>;

/// What a successful provisioning run hands back.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub roles: Roles,
    pub networks: Vec<Network>,
    pub result_dir: PathBuf,
}

/// Outcome of one automation unit run. The orchestrator consumes nothing
/// beyond success/failure and the captured log.
#[derive(Debug, Clone)]
pub struct Report {
    pub ok: bool,
    pub log: String,
}

/// Claims testbed resources and reports the role → host mapping.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Acquire (or re-acquire, when `force` is set) the resources for
    /// `deployment`. Expected to be idempotent: re-invoking after a partial
    /// failure is safe.
    async fn provision(&self, deployment: &str, force: bool) -> Result<Provisioned>;
}

/// Builds a provider from its opaque configuration section.
pub trait ProviderFactory: Send + Sync {
    fn create(
        &self,
        name: &str,
        section: &Value,
        deployment_dir: &Path,
    ) -> Result<Box<dyn Provider>>;
}

/// Renders the inventory artifact consumed by automation runs.
#[async_trait]
pub trait InventoryRenderer: Send + Sync {
    async fn render(
        &self,
        roles: &Roles,
        networks: &[Network],
        path: &Path,
        check_networks: bool,
    ) -> Result<()>;
}

/// Executes one named automation unit against the inventory.
#[async_trait]
pub trait Automation: Send + Sync {
    async fn apply(&self, unit: &str, inventory: Option<&Path>, vars: &ExtraVars)
    -> Result<Report>;
}

/// Applies network-shaping constraints to a provisioned deployment.
#[async_trait]
pub trait NetworkEmulator: Send + Sync {
    async fn emulate(&self, roles: &Roles, inventory: &Path, spec: &NetemSpec) -> Result<()>;

    async fn validate(&self, roles: &Roles, inventory: &Path) -> Result<()>;
}

/// Bundle of gateway implementations the orchestrator drives.
pub struct Gateways {
    pub providers: Box<dyn ProviderFactory>,
    pub inventory: Box<dyn InventoryRenderer>,
    pub automation: Box<dyn Automation>,
    pub netem: Box<dyn NetworkEmulator>,
}
