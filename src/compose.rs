//! Compose tool resolution, verb planning, and execution.
//!
//! Every controller verb maps to a plan (a fixed list of compose
//! invocations) computed before anything runs. Execution is sequential and
//! fail-fast: the first non-success exit aborts the run, and the failure
//! propagates to the process exit status. No retries, no rollback.
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;
use std::time::Instant;

/// Controller verbs that translate directly to compose invocations.
#[derive(Clone, Debug)]
pub enum StackVerb {
    Build,
    Up,
    Down,
    Restart,
    Logs { follow: bool, service: Option<String> },
    Status,
    Clean,
}

/// Compute the compose invocations for a verb.
///
/// `restart` is exactly the `down` plan followed by the `up` plan; every
/// other verb is a single invocation.
pub fn plan(verb: &StackVerb) -> Vec<Vec<String>> {
    match verb {
        StackVerb::Build => vec![args(&["build"])],
        StackVerb::Up => vec![args(&["up", "-d"])],
        StackVerb::Down => vec![args(&["down"])],
        StackVerb::Restart => {
            let mut invocations = plan(&StackVerb::Down);
            invocations.extend(plan(&StackVerb::Up));
            invocations
        }
        StackVerb::Logs { follow, service } => {
            let mut invocation = args(&["logs"]);
            if *follow {
                invocation.push("-f".to_string());
            }
            if let Some(service) = service {
                invocation.push(service.clone());
            }
            vec![invocation]
        }
        StackVerb::Status => vec![args(&["ps"])],
        StackVerb::Clean => vec![args(&["down", "-v", "--remove-orphans"])],
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

/// The resolved compose tool (`docker compose`, `docker-compose`, or an
/// operator override).
pub struct ComposeCommand {
    program: String,
    base_args: Vec<String>,
}

impl ComposeCommand {
    /// Resolve the compose command once per process invocation.
    ///
    /// `MONSTACK_COMPOSE` (shell-words split) wins; otherwise the docker CLI
    /// plugin form when `docker` is on PATH, else the standalone binary.
    pub fn resolve() -> Result<ComposeCommand> {
        if let Ok(raw) = std::env::var("MONSTACK_COMPOSE") {
            let parts = shell_words::split(&raw)
                .with_context(|| format!("parse MONSTACK_COMPOSE: {raw}"))?;
            let Some((program, base_args)) = parts.split_first() else {
                bail!("MONSTACK_COMPOSE is set but empty");
            };
            return Ok(ComposeCommand {
                program: program.clone(),
                base_args: base_args.to_vec(),
            });
        }

        if which::which("docker").is_ok() {
            Ok(ComposeCommand {
                program: "docker".to_string(),
                base_args: vec!["compose".to_string()],
            })
        } else {
            Ok(ComposeCommand {
                program: "docker-compose".to_string(),
                base_args: Vec::new(),
            })
        }
    }

    /// Run one invocation with inherited stdio, failing on non-success.
    pub fn run(&self, root: &Path, invocation: &[String]) -> Result<()> {
        let rendered = self.render(invocation);
        let start = Instant::now();
        let status = Command::new(&self.program)
            .args(&self.base_args)
            .args(invocation)
            .current_dir(root)
            .status()
            .with_context(|| format!("spawn `{rendered}`"))?;
        tracing::debug!(
            command = rendered.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            success = status.success(),
            "compose call complete"
        );
        if !status.success() {
            bail!("`{rendered}` failed with {status}");
        }
        Ok(())
    }

    /// Run the full plan for a verb, aborting at the first failure.
    pub fn run_plan(&self, root: &Path, verb: &StackVerb) -> Result<()> {
        for invocation in plan(verb) {
            self.run(root, &invocation)?;
        }
        Ok(())
    }

    /// Run one invocation with captured stdout (used by `status --json`).
    pub fn run_captured(&self, root: &Path, invocation: &[String]) -> Result<String> {
        let rendered = self.render(invocation);
        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(invocation)
            .current_dir(root)
            .output()
            .with_context(|| format!("spawn `{rendered}`"))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("`{rendered}` failed with {}: {}", output.status, stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn render(&self, invocation: &[String]) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.base_args.iter().cloned());
        parts.extend(invocation.iter().cloned());
        parts.join(" ")
    }
}
