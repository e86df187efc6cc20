//! Provider adapters
//!
//! A provider claims testbed resources and reports the role → host mapping.
//! The `static` provider claims nothing: the machines already exist and are
//! declared in its configuration section, so provisioning only validates the
//! declaration and stamps the deployment directory. Re-invoking it is
//! trivially idempotent.

use crate::error::{ProvisionError, Result};
use async_trait::async_trait;
use gridbench_core::{Host, Network, Provider, ProviderFactory, Provisioned};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Shape of the `static` provider section:
///
/// ```yaml
/// static:
///   resources:
///     database:
///       - address: parapluie-3.rennes.grid5000.fr
///         user: root
///   networks:
///     - name: database_network
///       cidr: 10.158.0.0/22
///       roles: [database]
/// ```
#[derive(Debug, Clone, Deserialize)]
struct StaticSection {
    resources: BTreeMap<String, Vec<Host>>,
    #[serde(default)]
    networks: Vec<Network>,
}

pub struct StaticProvider {
    section: StaticSection,
    deployment_dir: PathBuf,
}

impl StaticProvider {
    pub fn from_section(section: &Value, deployment_dir: &Path) -> Result<Self> {
        let parsed: StaticSection = serde_json::from_value(section.clone())
            .map_err(|e| ProvisionError::InvalidSection(format!("static: {e}")))?;

        if parsed.resources.values().all(|hosts| hosts.is_empty()) {
            return Err(ProvisionError::InvalidSection(
                "static: no hosts declared under 'resources'".to_string(),
            ));
        }

        Ok(Self {
            section: parsed,
            deployment_dir: deployment_dir.to_path_buf(),
        })
    }

    fn host_count(&self) -> usize {
        self.section.resources.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl Provider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn provision(&self, deployment: &str, force: bool) -> gridbench_core::Result<Provisioned> {
        tokio::fs::create_dir_all(&self.deployment_dir)
            .await
            .map_err(ProvisionError::Io)?;

        tracing::info!(
            deployment,
            force,
            hosts = self.host_count(),
            "claimed declared resources"
        );

        Ok(Provisioned {
            roles: self.section.resources.clone(),
            networks: self.section.networks.clone(),
            result_dir: self.deployment_dir.clone(),
        })
    }
}

/// Factory covering every provider this crate ships.
pub struct Providers;

impl ProviderFactory for Providers {
    fn create(
        &self,
        name: &str,
        section: &Value,
        deployment_dir: &Path,
    ) -> gridbench_core::Result<Box<dyn Provider>> {
        match name {
            "static" => Ok(Box::new(StaticProvider::from_section(
                section,
                deployment_dir,
            )?)),
            other => Err(gridbench_core::Error::UnsupportedProvider(
                other.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn section() -> Value {
        json!({
            "resources": {
                "database": [
                    {"address": "db-0.site.example", "user": "root"},
                    {"address": "db-1.site.example", "user": "root"},
                ],
                "openstack": [
                    {"address": "os-0.site.example"},
                ],
            },
            "networks": [
                {"name": "database_network", "cidr": "10.158.0.0/22", "roles": ["database"]},
            ],
        })
    }

    #[tokio::test]
    async fn static_provider_reports_declared_roles() {
        let dir = tempdir().unwrap();
        let deployment_dir = dir.path().join("exp-1");
        let provider = StaticProvider::from_section(&section(), &deployment_dir).unwrap();

        let provisioned = provider.provision("exp-1", false).await.unwrap();
        assert_eq!(provisioned.roles["database"].len(), 2);
        assert_eq!(provisioned.roles["openstack"].len(), 1);
        assert_eq!(provisioned.networks.len(), 1);
        assert_eq!(provisioned.result_dir, deployment_dir);
        assert!(deployment_dir.is_dir());
    }

    #[test]
    fn empty_resources_are_rejected() {
        let dir = tempdir().unwrap();
        let section = json!({"resources": {"database": []}});
        assert!(matches!(
            StaticProvider::from_section(&section, dir.path()),
            Err(ProvisionError::InvalidSection(_))
        ));
    }

    #[test]
    fn malformed_section_is_rejected() {
        let dir = tempdir().unwrap();
        let section = json!({"resources": "not-a-map"});
        assert!(StaticProvider::from_section(&section, dir.path()).is_err());
    }

    #[test]
    fn factory_rejects_unknown_provider_names() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Providers.create("vagrant", &section(), dir.path()),
            Err(gridbench_core::Error::UnsupportedProvider(name)) if name == "vagrant"
        ));
    }
}
