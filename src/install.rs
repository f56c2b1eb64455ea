//! Opt-in installer steps for the container runtime and compose tool.
//!
//! Both steps probe first and only run an installer when the probe fails.
//! The installer command lines are plain strings split with shell-words, so
//! operators can point them at their own package manager.
use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};

/// Override variable for the docker installer command.
pub const DOCKER_INSTALL_VAR: &str = "MONSTACK_DOCKER_INSTALL";
/// Override variable for the compose installer command.
pub const COMPOSE_INSTALL_VAR: &str = "MONSTACK_COMPOSE_INSTALL";

const DEFAULT_DOCKER_INSTALL: &str = "sh -c 'curl -fsSL https://get.docker.com | sh'";
const DEFAULT_COMPOSE_INSTALL: &str =
    "sh -c 'apt-get update && apt-get install -y docker-compose-plugin'";

/// Ensure the `docker` binary is on PATH, installing it if not.
pub fn ensure_docker() -> Result<()> {
    if which::which("docker").is_ok() {
        tracing::info!("docker already installed, skipping");
        return Ok(());
    }
    run_installer(
        &installer_command(DOCKER_INSTALL_VAR, DEFAULT_DOCKER_INSTALL),
        "docker",
    )
}

/// Ensure a compose subcommand answers `version`, installing it if not.
pub fn ensure_compose() -> Result<()> {
    if probe(&["docker", "compose", "version"]) || probe(&["docker-compose", "--version"]) {
        tracing::info!("compose already installed, skipping");
        return Ok(());
    }
    run_installer(
        &installer_command(COMPOSE_INSTALL_VAR, DEFAULT_COMPOSE_INSTALL),
        "compose",
    )
}

fn probe(command: &[&str]) -> bool {
    let Some((program, rest)) = command.split_first() else {
        return false;
    };
    Command::new(program)
        .args(rest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn installer_command(override_var: &str, default: &str) -> String {
    std::env::var(override_var).unwrap_or_else(|_| default.to_string())
}

fn run_installer(raw: &str, what: &str) -> Result<()> {
    let parts =
        shell_words::split(raw).with_context(|| format!("parse installer command: {raw}"))?;
    let Some((program, args)) = parts.split_first() else {
        bail!("{what} installer command is empty");
    };

    tracing::info!(command = raw, "installing {what}");
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("spawn {what} installer `{raw}`"))?;
    if !status.success() {
        bail!("{what} installer `{raw}` failed with {status}");
    }
    Ok(())
}
