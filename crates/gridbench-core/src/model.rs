//! Data model shared across the workspace

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One provisioned machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    /// Address the automation layer connects to (IP or FQDN).
    pub address: String,

    /// Optional short name used in the rendered inventory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Remote user, when it differs from the automation tool's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl Host {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            alias: None,
            user: None,
            port: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Name the host is listed under in the inventory.
    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.address)
    }
}

/// Network descriptor attached to one or more role groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,

    /// Role groups reachable on this network.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Role name → ordered list of hosts. BTreeMap keeps iteration deterministic.
pub type Roles = BTreeMap<String, Vec<Host>>;

/// Hosts of every role whose name starts with `prefix`, in role-name order.
pub fn hosts_with_role_prefix(roles: &Roles, prefix: &str) -> Vec<Host> {
    roles
        .iter()
        .filter(|(name, _)| name.starts_with(prefix))
        .flat_map(|(_, hosts)| hosts.iter().cloned())
        .collect()
}

/// One pairwise traffic-shaping rule between two role groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetemConstraint {
    pub src: String,
    pub dst: String,
    pub delay: String,
    pub rate: String,
    pub loss: String,
    pub network: String,
}

/// Traffic-shaping constraints applied by the emulate stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetemSpec {
    pub enable: bool,
    pub default_delay: String,
    pub default_rate: String,
    pub constraints: Vec<NetemConstraint>,
    /// Role groups the shaping rules are installed on.
    pub groups: Vec<String>,
}

impl Default for NetemSpec {
    fn default() -> Self {
        Self {
            enable: true,
            default_delay: "0ms".to_string(),
            default_rate: "10gbit".to_string(),
            constraints: vec![NetemConstraint {
                src: "database".to_string(),
                dst: "database".to_string(),
                delay: "0ms".to_string(),
                rate: "10gbit".to_string(),
                loss: "0".to_string(),
                network: "database_network".to_string(),
            }],
            groups: vec!["database".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_label_prefers_alias() {
        let host = Host::new("10.0.0.4").with_alias("db-1");
        assert_eq!(host.label(), "db-1");
        assert_eq!(Host::new("10.0.0.4").label(), "10.0.0.4");
    }

    #[test]
    fn role_prefix_matching_is_ordered_and_prefix_based() {
        let mut roles = Roles::new();
        roles.insert(
            "database".to_string(),
            vec![Host::new("db-0"), Host::new("db-1")],
        );
        roles.insert("database_extra".to_string(), vec![Host::new("db-x")]);
        roles.insert("openstack".to_string(), vec![Host::new("os-0")]);

        let hosts = hosts_with_role_prefix(&roles, "database");
        let addresses: Vec<&str> = hosts.iter().map(|h| h.address.as_str()).collect();
        assert_eq!(addresses, vec!["db-0", "db-1", "db-x"]);
    }

    #[test]
    fn default_netem_spec_targets_database_network() {
        let spec = NetemSpec::default();
        assert!(spec.enable);
        assert_eq!(spec.constraints.len(), 1);
        assert_eq!(spec.constraints[0].network, "database_network");
        assert_eq!(spec.groups, vec!["database".to_string()]);
    }
}
