//! Filesystem layout of a stack root.
//!
//! Every subcommand resolves its managed files through one `StackPaths` value
//! so there is a single place that knows where things live.
use std::path::{Path, PathBuf};

/// Paths derived from the stack root directory (`--root`).
pub struct StackPaths {
    root: PathBuf,
}

impl StackPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn env_file(&self) -> PathBuf {
        self.root.join(".env")
    }

    pub fn compose_file(&self) -> PathBuf {
        self.root.join("docker-compose.yml")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn template(&self, file_name: &str) -> PathBuf {
        self.templates_dir().join(file_name)
    }

    pub fn secrets_dir(&self) -> PathBuf {
        self.root.join("secrets")
    }

    pub fn secret(&self, file_name: &str) -> PathBuf {
        self.secrets_dir().join(file_name)
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.root.join("generated_configs")
    }

    pub fn generated(&self, file_name: &str) -> PathBuf {
        self.generated_dir().join(file_name)
    }
}
