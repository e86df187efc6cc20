//! The orchestrator
//!
//! Resolves a requested tag set into an ordered stage plan, then drives each
//! stage through the store and the gateways, persisting the Environment after
//! every success. Gateway failures are not retried: the delegated systems are
//! expected to be idempotent, so a failure aborts the remaining stages and
//! re-running the same command resumes from the last persisted stage.

use crate::config::{Config, ConfigInput};
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::gateway::{ExtraVars, Gateways};
use crate::model::{Host, NetemSpec};
use crate::stage::{self, Stage};
use crate::store::{DEFAULT_DEPLOYMENT, EnvStore};
use chrono::Utc;
use serde_json::json;
use std::path::{Path, PathBuf};

pub const DEFAULT_RALLY_DIRECTORY: &str = "keystone";

/// Tags a plain `deploy` runs when none are requested.
pub const DEFAULT_DEPLOY_TAGS: &[&str] = &[stage::PROVIDE, stage::INVENTORY, stage::SCAFFOLD];

const TEARDOWN_UNITS: &[&str] = &["scaffolding", "openstack", "rally"];

#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub config: ConfigInput,
    pub provider: String,
    pub force_deployment: bool,
    /// Deployment name; defaults to [`DEFAULT_DEPLOYMENT`].
    pub name: Option<String>,
    pub tags: Vec<String>,
}

/// Scenario selection for the benchmark stage.
#[derive(Debug, Clone, Default)]
pub struct RallyOptions {
    /// Scenario files, mutually exclusive with `directory`.
    pub files: Vec<String>,
    /// Scenario directory, used when `files` is empty.
    pub directory: Option<String>,
    /// Run on every database host instead of the designated one.
    pub high: bool,
}

pub struct Orchestrator {
    store: EnvStore,
    gateways: Gateways,
}

impl Orchestrator {
    pub fn new(store: EnvStore, gateways: Gateways) -> Self {
        Self { store, gateways }
    }

    pub fn store(&self) -> &EnvStore {
        &self.store
    }

    /// Deployment a non-deploy command operates on: whatever `deploy` saved
    /// last, or the default name when nothing was ever deployed.
    fn active_deployment(&self) -> String {
        self.store
            .current()
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string())
    }

    async fn persist(&self, name: &str, env: &mut Environment) -> Result<()> {
        env.updated_at = Utc::now();
        self.store.save(name, env).await
    }

    /// Load config, resolve the requested tags and run the plan. The
    /// Environment is persisted after every completed stage, so a failure
    /// mid-plan leaves a resumable state behind.
    pub async fn deploy(&self, opts: DeployOptions) -> Result<()> {
        let name = opts
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_DEPLOYMENT.to_string());
        let mut env = self.store.load(&name).await?;

        let config = Config::load(&opts.config)?;
        env.apply_config(config);

        let plan = stage::resolve(&opts.tags, &env.completed)?;
        for st in plan {
            tracing::info!(stage = st.tag, deployment = name.as_str(), "running stage");
            self.run_stage(st, &opts, &name, &mut env).await?;
            env.mark_completed(st.tag);
            self.persist(&name, &mut env).await?;
        }
        Ok(())
    }

    async fn run_stage(
        &self,
        st: &Stage,
        opts: &DeployOptions,
        name: &str,
        env: &mut Environment,
    ) -> Result<()> {
        match st.tag {
            stage::PROVIDE => self.provide(opts, name, env).await,
            stage::INVENTORY => self.render_inventory(name, env).await,
            stage::SCAFFOLD => self.scaffold_stage(env).await,
            stage::OPENSTACK => self.openstack_stage(env).await,
            stage::STRESS => self.stress_stage(env).await,
            stage::RALLY => self.rally_stage(env, &RallyOptions::default()).await,
            stage::EMULATE => self.emulate_stage(env, &NetemSpec::default()).await,
            stage::BACKUP => {
                let dir = self.default_backup_dir(name)?;
                self.backup_stage(env, &dir).await
            }
            stage::DESTROY => self.destroy_stage(env).await,
            other => Err(Error::UnknownTag(other.to_string())),
        }
    }

    async fn provide(
        &self,
        opts: &DeployOptions,
        name: &str,
        env: &mut Environment,
    ) -> Result<()> {
        if env.provisioned() && !opts.force_deployment {
            tracing::info!("resources already claimed, reusing them");
            return Ok(());
        }

        let section = env.config.provider_section(&opts.provider)?.clone();
        let deployment_dir = self.store.deployment_dir(name);
        let provider = self
            .gateways
            .providers
            .create(&opts.provider, &section, &deployment_dir)?;
        let provisioned = provider.provision(name, opts.force_deployment).await?;

        // Replaced wholesale, never patched in place.
        env.provider = Some(opts.provider.clone());
        env.result_dir = Some(provisioned.result_dir);
        env.roles = provisioned.roles;
        env.networks = provisioned.networks;
        Ok(())
    }

    async fn render_inventory(&self, name: &str, env: &mut Environment) -> Result<()> {
        let dir = env
            .result_dir
            .clone()
            .unwrap_or_else(|| self.store.deployment_dir(name));
        let path = dir.join("hosts");
        self.gateways
            .inventory
            .render(&env.roles, &env.networks, &path, true)
            .await?;
        env.inventory = Some(path);
        Ok(())
    }

    async fn scaffold_stage(&self, env: &Environment) -> Result<()> {
        let registry = env.config.registry()?.clone();
        let mut vars = ExtraVars::new();
        vars.insert("registry".to_string(), registry);
        vars.insert("db".to_string(), json!(env.db));
        vars.insert("monitoring".to_string(), json!(env.monitoring));
        vars.insert("action".to_string(), json!("deploy"));
        self.apply_unit("scaffolding", env, vars).await
    }

    async fn openstack_stage(&self, env: &Environment) -> Result<()> {
        let mut vars = ExtraVars::new();
        vars.insert("db".to_string(), json!(env.db));
        vars.insert("action".to_string(), json!("deploy"));
        self.apply_unit("openstack", env, vars).await
    }

    async fn stress_stage(&self, env: &Environment) -> Result<()> {
        let registry = env.config.registry()?.clone();
        let mut vars = ExtraVars::new();
        vars.insert("registry".to_string(), registry);
        vars.insert("db".to_string(), json!(env.db));
        vars.insert("action".to_string(), json!("stress"));
        self.apply_unit("stress", env, vars).await
    }

    async fn rally_stage(&self, env: &mut Environment, opts: &RallyOptions) -> Result<()> {
        let database_hosts = env.database_hosts();

        // High mode benchmarks every database host. Light mode picks the
        // second one only: the first is assumed to share its machine with the
        // primary database service.
        let targets: Vec<Host> = if opts.high {
            database_hosts
        } else {
            match database_hosts.get(1) {
                Some(host) => vec![host.clone()],
                None => return Err(Error::NotEnoughHosts(database_hosts.len())),
            }
        };

        let mut vars = ExtraVars::new();
        vars.insert("rally_nodes".to_string(), json!(addresses(&targets)));
        if opts.files.is_empty() {
            let directory = opts
                .directory
                .clone()
                .unwrap_or_else(|| DEFAULT_RALLY_DIRECTORY.to_string());
            vars.insert("rally_directory".to_string(), json!(directory));
        } else {
            vars.insert("rally_files".to_string(), json!(opts.files));
        }
        vars.insert("action".to_string(), json!("deploy"));

        env.rally_nodes = targets;
        self.apply_unit("rally", env, vars).await
    }

    async fn emulate_stage(&self, env: &mut Environment, spec: &NetemSpec) -> Result<()> {
        let inventory = env.inventory.clone().ok_or(Error::MissingPrerequisite {
            stage: stage::EMULATE.to_string(),
            missing: stage::INVENTORY.to_string(),
        })?;
        self.gateways
            .netem
            .emulate(&env.roles, &inventory, spec)
            .await?;
        env.latency = Some(spec.default_delay.clone());
        Ok(())
    }

    async fn backup_stage(&self, env: &Environment, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        for unit in TEARDOWN_UNITS {
            let mut vars = ExtraVars::new();
            vars.insert("action".to_string(), json!("backup"));
            vars.insert("db".to_string(), json!(env.db));
            vars.insert("monitoring".to_string(), json!(env.monitoring));
            vars.insert("backup_dir".to_string(), json!(dir));
            vars.insert("rally_nodes".to_string(), json!(addresses(&env.rally_nodes)));
            self.apply_unit(unit, env, vars).await?;
        }
        Ok(())
    }

    async fn destroy_stage(&self, env: &Environment) -> Result<()> {
        // Tolerates an Environment that never completed a deploy: the
        // derived fields all have defaults.
        for unit in TEARDOWN_UNITS {
            let mut vars = ExtraVars::new();
            vars.insert("action".to_string(), json!("destroy"));
            vars.insert("db".to_string(), json!(env.db));
            vars.insert("monitoring".to_string(), json!(env.monitoring));
            vars.insert("rally_nodes".to_string(), json!(addresses(&env.rally_nodes)));
            self.apply_unit(unit, env, vars).await?;
        }
        Ok(())
    }

    async fn apply_unit(&self, unit: &str, env: &Environment, vars: ExtraVars) -> Result<()> {
        let report = self
            .gateways
            .automation
            .apply(unit, env.inventory.as_deref(), &vars)
            .await?;
        if !report.ok {
            return Err(Error::Automation {
                unit: unit.to_string(),
                log: report.log,
            });
        }
        Ok(())
    }

    fn default_backup_dir(&self, name: &str) -> Result<PathBuf> {
        Ok(std::path::absolute(
            self.store.deployment_dir(name).join("backup"),
        )?)
    }

    /// Deploy OpenStack on top of an existing scaffolding.
    pub async fn openstack(&self) -> Result<()> {
        let name = self.active_deployment();
        let mut env = self.store.load(&name).await?;
        stage::resolve(&[stage::OPENSTACK.to_string()], &env.completed)?;

        self.openstack_stage(&env).await?;
        env.mark_completed(stage::OPENSTACK);
        self.persist(&name, &mut env).await
    }

    /// Launch the sysbench suite against the deployed database.
    pub async fn stress(&self) -> Result<()> {
        let name = self.active_deployment();
        let mut env = self.store.load(&name).await?;
        stage::resolve(&[stage::STRESS.to_string()], &env.completed)?;

        self.stress_stage(&env).await?;
        env.mark_completed(stage::STRESS);
        self.persist(&name, &mut env).await
    }

    /// Benchmark the deployed OpenStack; records the chosen target hosts in
    /// the Environment for later backup/destroy runs.
    pub async fn rally(&self, opts: RallyOptions) -> Result<()> {
        let name = self.active_deployment();
        let mut env = self.store.load(&name).await?;
        stage::resolve(&[stage::RALLY.to_string()], &env.completed)?;

        self.rally_stage(&mut env, &opts).await?;
        env.mark_completed(stage::RALLY);
        self.persist(&name, &mut env).await
    }

    /// Apply traffic-shaping constraints to the provisioned inventory.
    pub async fn emulate(&self, spec: Option<NetemSpec>) -> Result<()> {
        let name = self.active_deployment();
        let mut env = self.store.load(&name).await?;
        stage::resolve(&[stage::EMULATE.to_string()], &env.completed)?;

        let spec = spec.unwrap_or_default();
        self.emulate_stage(&mut env, &spec).await?;
        env.mark_completed(stage::EMULATE);
        self.persist(&name, &mut env).await
    }

    /// Check connectivity across the declared networks.
    pub async fn validate(&self) -> Result<()> {
        let name = self.active_deployment();
        let env = self.store.load(&name).await?;
        let inventory = env.inventory.clone().ok_or(Error::MissingPrerequisite {
            stage: "validate".to_string(),
            missing: stage::INVENTORY.to_string(),
        })?;
        self.gateways.netem.validate(&env.roles, &inventory).await
    }

    /// Back up every deployed unit into `dir` (created when absent).
    /// Returns the resolved absolute backup directory.
    pub async fn backup(&self, dir: Option<PathBuf>) -> Result<PathBuf> {
        let name = self.active_deployment();
        let mut env = self.store.load(&name).await?;
        stage::resolve(&[stage::BACKUP.to_string()], &env.completed)?;

        let dir = match dir {
            Some(dir) => std::path::absolute(dir)?,
            None => self.default_backup_dir(&name)?,
        };
        self.backup_stage(&env, &dir).await?;
        env.mark_completed(stage::BACKUP);
        self.persist(&name, &mut env).await?;
        Ok(dir)
    }

    /// Tear down every deployed unit. The claimed resources and the persisted
    /// Environment are left in place.
    pub async fn destroy(&self) -> Result<()> {
        let name = self.active_deployment();
        let mut env = self.store.load(&name).await?;
        stage::resolve(&[stage::DESTROY.to_string()], &env.completed)?;

        self.destroy_stage(&env).await?;
        env.mark_completed(stage::DESTROY);
        self.persist(&name, &mut env).await
    }

    /// Load the Environment for inspection, either from an explicit
    /// deployment directory or from the active deployment.
    pub async fn inspect(&self, env_dir: Option<&Path>) -> Result<Environment> {
        match env_dir {
            Some(dir) => EnvStore::load_dir(dir).await,
            None => {
                let name = self.active_deployment();
                self.store.load(&name).await
            }
        }
    }
}

fn addresses(hosts: &[Host]) -> Vec<String> {
    hosts.iter().map(|h| h.address.clone()).collect()
}
