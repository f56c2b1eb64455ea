//! Generation and parsing of the stack `.env` file.
//!
//! The file always carries exactly the documented keys. Values come from the
//! process environment when set, otherwise from the defaults below, and the
//! file is overwritten unconditionally on regeneration.
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::paths::StackPaths;

/// The documented keys and their defaults, in file order.
pub const ENV_DEFAULTS: [(&str, &str); 6] = [
    ("PROMETHEUS_PORT", "9090"),
    ("NODE_EXPORTER_PORT", "9100"),
    ("GRAFANA_PORT", "3000"),
    ("ALERTMANAGER_PORT", "9093"),
    (
        "SLACK_WEBHOOK_ENDPOINT",
        "https://hooks.slack.com/services/REPLACE/ME/TOKEN",
    ),
    ("SLACK_CHANNEL", "#monitoring-alerts"),
];

/// Write `.env` under the stack root from defaults plus environment overrides.
pub fn generate(paths: &StackPaths) -> Result<()> {
    let env_path = paths.env_file();
    let mut contents = String::from("# Generated by monstack; rerun `monstack setup --step=env` to refresh.\n");
    for (key, default) in ENV_DEFAULTS {
        let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
        contents.push_str(&format!("{key}={value}\n"));
    }
    fs::write(&env_path, contents)
        .with_context(|| format!("write {}", env_path.display()))?;
    tracing::info!(path = %env_path.display(), "generated environment file");
    Ok(())
}

/// Load the key/value mapping from an existing `.env`.
///
/// Substitution steps call this; a missing file is the fail-fast case for
/// every generation step that depends on env generation having run.
pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.is_file() {
        return Err(anyhow!(
            "environment file {} is missing; run `monstack setup --step=env` first",
            path.display()
        ));
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut vars = BTreeMap::new();
    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            anyhow!("{}:{}: expected KEY=VALUE", path.display(), line_no + 1)
        })?;
        vars.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn stack_in_tempdir() -> (tempfile::TempDir, StackPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = StackPaths::new(dir.path().to_path_buf());
        (dir, paths)
    }

    #[test]
    fn fresh_env_file_defines_exactly_the_documented_keys() {
        let (_dir, paths) = stack_in_tempdir();
        generate(&paths).unwrap();

        let vars = load(&paths.env_file()).unwrap();
        assert_eq!(vars.len(), ENV_DEFAULTS.len());
        for (key, default) in ENV_DEFAULTS {
            // Defaults apply unless the test runner exports the key itself.
            let expected = std::env::var(key).unwrap_or_else(|_| default.to_string());
            assert_eq!(vars.get(key), Some(&expected), "key {key}");
        }
    }

    #[test]
    fn regeneration_overwrites_unconditionally() {
        let (_dir, paths) = stack_in_tempdir();
        fs::write(paths.env_file(), "PROMETHEUS_PORT=1\nSTALE_KEY=1\n").unwrap();
        generate(&paths).unwrap();

        let vars = load(&paths.env_file()).unwrap();
        assert!(!vars.contains_key("STALE_KEY"));
        assert_eq!(vars.len(), ENV_DEFAULTS.len());
    }

    #[test]
    fn load_missing_file_fails() {
        let err = load(&PathBuf::from("/nonexistent/.env")).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn load_skips_comments_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# comment\n\nGRAFANA_PORT=3001\n").unwrap();
        let vars = load(&path).unwrap();
        assert_eq!(vars.get("GRAFANA_PORT").map(String::as_str), Some("3001"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn load_rejects_lines_without_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "NOT A PAIR\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("KEY=VALUE"));
    }
}
