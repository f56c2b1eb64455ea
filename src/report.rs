//! Machine-readable status output for `status --json`.
use serde::Serialize;
use std::path::Path;

use crate::envfile::ENV_DEFAULTS;
use crate::paths::StackPaths;
use crate::secrets::SECRETS;

const STATUS_SCHEMA_VERSION: u32 = 1;

/// Presence of one file the tool manages.
#[derive(Serialize)]
pub struct ArtifactStatus {
    pub path: String,
    pub present: bool,
}

/// Everything `status --json` reports: the compose `ps` output plus which
/// managed files exist under the stack root.
#[derive(Serialize)]
pub struct StatusReport {
    pub schema_version: u32,
    pub root: String,
    pub compose_ps: String,
    pub env_keys: Vec<String>,
    pub artifacts: Vec<ArtifactStatus>,
}

pub fn collect(paths: &StackPaths, compose_ps: String) -> StatusReport {
    let mut artifacts = vec![
        artifact(paths.root(), &paths.env_file()),
        artifact(paths.root(), &paths.compose_file()),
    ];
    for spec in &SECRETS {
        artifacts.push(artifact(paths.root(), &paths.secret(spec.file_name)));
    }
    for generated in ["prometheus.yml", "alertmanager.yml", "alert_rules.yml"] {
        artifacts.push(artifact(paths.root(), &paths.generated(generated)));
    }

    StatusReport {
        schema_version: STATUS_SCHEMA_VERSION,
        root: paths.root().display().to_string(),
        compose_ps,
        env_keys: ENV_DEFAULTS.iter().map(|(key, _)| key.to_string()).collect(),
        artifacts,
    }
}

fn artifact(root: &Path, path: &Path) -> ArtifactStatus {
    let display = path
        .strip_prefix(root)
        .map(|rel| rel.display().to_string())
        .unwrap_or_else(|_| path.display().to_string());
    ArtifactStatus {
        path: display,
        present: path.is_file(),
    }
}
