//! Inventory rendering
//!
//! Renders the role → host mapping into the INI inventory consumed by the
//! automation tool, one `[role]` group per role. With `check_networks` set,
//! the declared networks are validated first: unknown role references,
//! duplicate network names and malformed CIDRs are rejected before anything
//! is written.

use crate::error::{ProvisionError, Result};
use async_trait::async_trait;
use gridbench_core::{InventoryRenderer, Network, Roles};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::net::IpAddr;
use std::path::Path;

pub struct IniInventory;

fn check_networks(roles: &Roles, networks: &[Network]) -> Result<()> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for network in networks {
        if !seen.insert(network.name.as_str()) {
            return Err(ProvisionError::Network(format!(
                "duplicate network '{}'",
                network.name
            )));
        }
        for role in &network.roles {
            if !roles.contains_key(role) {
                return Err(ProvisionError::Network(format!(
                    "network '{}' references unknown role '{}'",
                    network.name, role
                )));
            }
        }
        if let Some(cidr) = &network.cidr {
            check_cidr(&network.name, cidr)?;
        }
    }
    Ok(())
}

fn check_cidr(network: &str, cidr: &str) -> Result<()> {
    let bad = || ProvisionError::Network(format!("network '{network}': malformed CIDR '{cidr}'"));

    let (addr, prefix) = cidr.split_once('/').ok_or_else(bad)?;
    let addr: IpAddr = addr.parse().map_err(|_| bad())?;
    let prefix: u8 = prefix.parse().map_err(|_| bad())?;
    let max = if addr.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return Err(bad());
    }
    Ok(())
}

fn render(roles: &Roles) -> String {
    let mut out = String::new();
    for (role, hosts) in roles {
        let _ = writeln!(out, "[{role}]");
        for host in hosts {
            let mut line = host.label().to_string();
            if host.alias.is_some() {
                let _ = write!(line, " ansible_host={}", host.address);
            }
            if let Some(user) = &host.user {
                let _ = write!(line, " ansible_user={user}");
            }
            if let Some(port) = host.port {
                let _ = write!(line, " ansible_port={port}");
            }
            let _ = writeln!(out, "{line}");
        }
        out.push('\n');
    }
    out
}

#[async_trait]
impl InventoryRenderer for IniInventory {
    async fn render(
        &self,
        roles: &Roles,
        networks: &[Network],
        path: &Path,
        check: bool,
    ) -> gridbench_core::Result<()> {
        if check {
            check_networks(roles, networks)?;
        }

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ProvisionError::Io)?;
        }
        tokio::fs::write(path, render(roles))
            .await
            .map_err(ProvisionError::Io)?;

        tracing::debug!(path = %path.display(), groups = roles.len(), "inventory rendered");
        Ok(())
    }
}
