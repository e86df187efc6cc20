//! Environment persistence
//!
//! One state artifact per deployment name: `<base>/<name>/env.json`, pretty
//! JSON so `info --out` can re-render it. A `current` symlink at the base dir
//! points at the deployment saved last, which is how commands after `deploy`
//! find the active deployment without naming it.
//!
//! Writes go through a temp file and a rename, so a crash mid-write never
//! leaves a partial artifact visible to `load`. There is no locking beyond
//! that: concurrent invocations against the same deployment name are
//! unsupported and behave last-writer-wins.

use crate::env::Environment;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const ENV_FILE: &str = "env.json";
const ENV_TMP: &str = "env.json.tmp";
pub const CURRENT_LINK: &str = "current";
pub const DEFAULT_DEPLOYMENT: &str = "default";

pub struct EnvStore {
    base: PathBuf,
}

impl EnvStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory every artifact of `name` lives under.
    pub fn deployment_dir(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    fn env_path(&self, name: &str) -> PathBuf {
        self.deployment_dir(name).join(ENV_FILE)
    }

    /// Load the state of `name`. A deployment that was never saved loads as
    /// the default empty Environment; an artifact that exists but cannot be
    /// parsed is a [`Error::StoreCorrupt`].
    pub async fn load(&self, name: &str) -> Result<Environment> {
        let path = self.env_path(name);
        if !path.exists() {
            tracing::debug!(deployment = name, "no state artifact, starting empty");
            return Ok(Environment::default());
        }

        let raw = fs::read_to_string(&path).await?;
        serde_json::from_str(&raw).map_err(|e| Error::StoreCorrupt {
            path,
            message: e.to_string(),
        })
    }

    /// Load `env.json` straight out of a deployment directory.
    pub async fn load_dir(dir: &Path) -> Result<Environment> {
        let path = dir.join(ENV_FILE);
        let raw = fs::read_to_string(&path).await.map_err(|e| Error::StoreCorrupt {
            path: path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| Error::StoreCorrupt {
            path,
            message: e.to_string(),
        })
    }

    pub async fn save(&self, name: &str, env: &Environment) -> Result<()> {
        let dir = self.deployment_dir(name);
        fs::create_dir_all(&dir).await?;

        let tmp = dir.join(ENV_TMP);
        let content = serde_json::to_string_pretty(env)?;
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, self.env_path(name)).await?;

        self.update_current(name).await?;
        tracing::debug!(deployment = name, "state saved");
        Ok(())
    }

    /// Name of the deployment the `current` symlink points at.
    pub fn current(&self) -> Option<String> {
        let target = std::fs::read_link(self.base.join(CURRENT_LINK)).ok()?;
        target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    #[cfg(unix)]
    async fn update_current(&self, name: &str) -> Result<()> {
        let link = self.base.join(CURRENT_LINK);
        if fs::symlink_metadata(&link).await.is_ok() {
            fs::remove_file(&link).await?;
        }
        fs::symlink(name, &link).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn update_current(&self, _name: &str) -> Result<()> {
        Ok(())
    }
}
