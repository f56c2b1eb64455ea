//! Default secret files for the stack.
//!
//! Secrets are idempotent by existence: a file already on disk is never
//! rewritten, whatever its content. The shipped values are placeholders the
//! operator is expected to replace before exposing anything.
use anyhow::{Context, Result};
use std::fs;

use crate::paths::StackPaths;

pub struct SecretSpec {
    pub file_name: &'static str,
    pub default_value: &'static str,
}

pub const SECRETS: [SecretSpec; 3] = [
    SecretSpec {
        file_name: "grafana_admin_password.txt",
        default_value: "admin123",
    },
    SecretSpec {
        file_name: "alertmanager_password.txt",
        default_value: "alert123",
    },
    SecretSpec {
        file_name: "slack_webhook.txt",
        default_value: "https://hooks.slack.com/services/REPLACE/ME/TOKEN",
    },
];

/// Create any secret file that does not exist yet; leave the rest untouched.
pub fn materialize(paths: &StackPaths) -> Result<()> {
    let secrets_dir = paths.secrets_dir();
    fs::create_dir_all(&secrets_dir)
        .with_context(|| format!("create {}", secrets_dir.display()))?;

    for spec in &SECRETS {
        let path = paths.secret(spec.file_name);
        if path.exists() {
            tracing::debug!(path = %path.display(), "secret already present, leaving as-is");
            continue;
        }
        fs::write(&path, format!("{}\n", spec.default_value))
            .with_context(|| format!("write {}", path.display()))?;
        tracing::info!(path = %path.display(), "created default secret");
    }
    Ok(())
}
