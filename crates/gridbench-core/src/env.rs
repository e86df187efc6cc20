//! Run state of one named deployment
//!
//! The `Environment` is created empty on the first `deploy`, persisted by the
//! store after every stage that mutates it, and reloaded at the start of
//! every later command. Teardown only asks the automation layer to remove the
//! deployed units; the persisted state survives so `info` and `backup` stay
//! usable afterwards.

use crate::config::{Config, DEFAULT_DATABASE};
use crate::model::{Host, Network, Roles, hosts_with_role_prefix};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Provider that claimed the resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Created at first provisioning, stable for the deployment's lifetime.
    /// All generated artifacts live under it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_dir: Option<PathBuf>,

    /// Role name → provisioned hosts. Replaced wholesale on re-provisioning,
    /// never patched in place.
    #[serde(default)]
    pub roles: Roles,

    #[serde(default)]
    pub networks: Vec<Network>,

    /// Rendered inventory artifact consumed by automation runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<PathBuf>,

    /// Parsed deployment configuration, read-only after load.
    #[serde(default)]
    pub config: Config,

    /// Database engine selected at config load.
    pub db: String,

    pub monitoring: bool,

    /// Hosts the benchmark stage picked; reused by backup and destroy.
    #[serde(default)]
    pub rally_nodes: Vec<Host>,

    /// Default delay applied by the last emulate run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<String>,

    /// Tags of stages that completed in this or a previous invocation.
    #[serde(default)]
    pub completed: BTreeSet<String>,
}

impl Default for Environment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            provider: None,
            result_dir: None,
            roles: Roles::new(),
            networks: Vec::new(),
            inventory: None,
            config: Config::default(),
            db: DEFAULT_DATABASE.to_string(),
            monitoring: true,
            rally_nodes: Vec::new(),
            latency: None,
            completed: BTreeSet::new(),
        }
    }
}

impl Environment {
    /// Copy the derived flags out of a freshly loaded configuration.
    pub fn apply_config(&mut self, config: Config) {
        self.db = config.database();
        self.monitoring = config.monitoring();
        self.config = config;
    }

    pub fn mark_completed(&mut self, tag: &str) {
        self.completed.insert(tag.to_string());
    }

    pub fn provisioned(&self) -> bool {
        !self.roles.is_empty()
    }

    /// Hosts of every role whose name starts with `database`, in role-name
    /// order.
    pub fn database_hosts(&self) -> Vec<Host> {
        hosts_with_role_prefix(&self.roles, "database")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigInput;
    use serde_json::json;

    #[test]
    fn default_environment_carries_derived_defaults() {
        let env = Environment::default();
        assert_eq!(env.db, "cockroachdb");
        assert!(env.monitoring);
        assert!(env.rally_nodes.is_empty());
        assert!(!env.provisioned());
    }

    #[test]
    fn apply_config_overrides_derived_flags() {
        let mut env = Environment::default();
        let config = Config::load(&ConfigInput::Value(json!({
            "database": "mariadb",
            "monitoring": false,
        })))
        .unwrap();

        env.apply_config(config);
        assert_eq!(env.db, "mariadb");
        assert!(!env.monitoring);
    }

    #[test]
    fn json_round_trip_preserves_every_field() {
        let mut env = Environment::default();
        env.roles.insert(
            "database".to_string(),
            vec![Host::new("db-0").with_user("root")],
        );
        env.networks.push(Network {
            name: "database_network".to_string(),
            cidr: Some("10.0.0.0/24".to_string()),
            gateway: None,
            dns: None,
            roles: vec!["database".to_string()],
        });
        env.mark_completed("provide");

        let raw = serde_json::to_string_pretty(&env).unwrap();
        let back: Environment = serde_json::from_str(&raw).unwrap();
        assert_eq!(env, back);
    }
}
