//! gridbench core — run state, stage planning and gateway contracts
//!
//! One deployment is a named instance of a provisioned, configured multi-host
//! stack plus its persisted state. The pieces:
//!
//! - [`env::Environment`] — the mutable run-state blob of one deployment
//! - [`store::EnvStore`] — atomic load/save of that blob, one artifact per
//!   deployment name
//! - [`stage`] — the registry of tag-selectable stages and their
//!   prerequisites
//! - [`gateway`] — contracts for the external provisioning, inventory,
//!   automation and network-emulation systems
//! - [`orchestrator::Orchestrator`] — resolves tags into a plan and drives it
//!   through the store and the gateways

pub mod config;
pub mod env;
pub mod error;
pub mod gateway;
pub mod model;
pub mod orchestrator;
pub mod stage;
pub mod store;

pub use config::{Config, ConfigInput, DEFAULT_DATABASE};
pub use env::Environment;
pub use error::{Error, Result};
pub use gateway::{
    Automation, ExtraVars, Gateways, InventoryRenderer, NetworkEmulator, Provider,
    ProviderFactory, Provisioned, Report,
};
pub use model::{Host, NetemConstraint, NetemSpec, Network, Roles};
pub use orchestrator::{
    DEFAULT_DEPLOY_TAGS, DEFAULT_RALLY_DIRECTORY, DeployOptions, Orchestrator, RallyOptions,
};
pub use store::{DEFAULT_DEPLOYMENT, EnvStore};
