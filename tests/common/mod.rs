//! Shared test infrastructure for integration tests.
//!
//! Each fixture owns a temp directory used as the stack root and spawns the
//! real binary against it. No test here needs a container runtime: the
//! setup steps are filesystem-only, and controller tests point
//! `MONSTACK_COMPOSE` at stand-in commands.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const ENV_KEYS: [&str; 6] = [
    "PROMETHEUS_PORT",
    "NODE_EXPORTER_PORT",
    "GRAFANA_PORT",
    "ALERTMANAGER_PORT",
    "SLACK_WEBHOOK_ENDPOINT",
    "SLACK_CHANNEL",
];

pub struct StackFixture {
    dir: TempDir,
}

impl StackFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp stack root");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a template under `templates/` in the fixture root.
    pub fn write_template(&self, file_name: &str, contents: &str) {
        let dir = self.root().join("templates");
        fs::create_dir_all(&dir).expect("create templates dir");
        fs::write(dir.join(file_name), contents).expect("write template");
    }

    pub fn write_file(&self, rel: &str, contents: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, contents).expect("write file");
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root().join(rel)).expect("read fixture file")
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root().join(rel).exists()
    }

    /// Run the binary with `--root` pointing at the fixture.
    ///
    /// The documented env keys are scrubbed so host environment never leaks
    /// into generated defaults.
    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_monstack"));
        command.args(args).arg("--root").arg(self.root());
        for key in ENV_KEYS {
            command.env_remove(key);
        }
        command
            .stdin(Stdio::null())
            .output()
            .expect("spawn monstack")
    }

    /// Run with extra environment variables set for the child.
    pub fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_monstack"));
        command.args(args).arg("--root").arg(self.root());
        for key in ENV_KEYS {
            command.env_remove(key);
        }
        for (key, value) in envs {
            command.env(key, value);
        }
        command
            .stdin(Stdio::null())
            .output()
            .expect("spawn monstack")
    }

    /// Run with a string piped to stdin (confirmation prompts).
    pub fn run_with_stdin_and_env(
        &self,
        args: &[&str],
        input: &str,
        envs: &[(&str, &str)],
    ) -> Output {
        use std::io::Write;

        let mut command = Command::new(env!("CARGO_BIN_EXE_monstack"));
        command
            .args(args)
            .arg("--root")
            .arg(self.root())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in envs {
            command.env(key, value);
        }
        let mut child = command.spawn().expect("spawn monstack");
        child
            .stdin
            .take()
            .expect("child stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        child.wait_with_output().expect("wait for monstack")
    }

    /// Parse the generated `.env` into a map, skipping comments.
    pub fn env_file_entries(&self) -> BTreeMap<String, String> {
        self.read(".env")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                line.split_once('=')
                    .map(|(key, value)| (key.to_string(), value.to_string()))
            })
            .collect()
    }
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
