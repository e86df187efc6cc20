use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestDeployment {
    pub root: TempDir,
}

impl TestDeployment {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    #[allow(dead_code)]
    pub fn write_conf(&self, content: &str) -> PathBuf {
        let path = self.root.path().join("conf.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    /// State directory handed to the binary via GRIDBENCH_HOME.
    pub fn home(&self) -> PathBuf {
        self.root.path().join(".gridbench")
    }
}
