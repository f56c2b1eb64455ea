//! Bootstrap step names and selection.
//!
//! The selection is computed once from the CLI flags before any step runs;
//! execution only ever reads it. `--step` directives reset the set to empty
//! the first time one appears, then enable the listed steps; `--skip`
//! directives disable. Directives apply in argument order.
use anyhow::{anyhow, Result};

/// One unit of setup work that can be included or excluded from a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    DockerInstall,
    ComposeInstall,
    Env,
    Secrets,
    Prometheus,
    Alertmanager,
    Rules,
}

impl Step {
    /// Fixed execution order; selection never changes it.
    pub const EXECUTION_ORDER: [Step; 7] = [
        Step::DockerInstall,
        Step::ComposeInstall,
        Step::Env,
        Step::Secrets,
        Step::Prometheus,
        Step::Alertmanager,
        Step::Rules,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::DockerInstall => "docker-install",
            Step::ComposeInstall => "compose-install",
            Step::Env => "env",
            Step::Secrets => "secrets",
            Step::Prometheus => "prometheus",
            Step::Alertmanager => "alertmanager",
            Step::Rules => "rules",
        }
    }

    pub fn parse(name: &str) -> Result<Step> {
        Step::EXECUTION_ORDER
            .into_iter()
            .find(|step| step.name() == name)
            .ok_or_else(|| {
                anyhow!(
                    "unknown step name: {name} (valid steps: {})",
                    valid_step_names()
                )
            })
    }

    /// Install steps are opt-in; generation steps run by default.
    fn default_enabled(self) -> bool {
        !matches!(self, Step::DockerInstall | Step::ComposeInstall)
    }

    fn index(self) -> usize {
        Step::EXECUTION_ORDER
            .iter()
            .position(|step| *step == self)
            .unwrap_or(0)
    }
}

fn valid_step_names() -> String {
    Step::EXECUTION_ORDER
        .iter()
        .map(|step| step.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One `--step=` or `--skip=` occurrence, in argument order.
#[derive(Clone, Debug)]
pub enum Directive {
    Enable(String),
    Disable(String),
}

/// Immutable set of enabled steps for one bootstrap run.
#[derive(Clone, Debug)]
pub struct StepSelection {
    enabled: [bool; 7],
}

impl StepSelection {
    /// Resolve the effective selection from ordered directives.
    ///
    /// `install_docker` force-enables both install steps after all directives
    /// have been applied, so `--install-docker --step=env` still installs.
    pub fn resolve(directives: &[Directive], install_docker: bool) -> Result<StepSelection> {
        let mut enabled = [false; 7];
        for step in Step::EXECUTION_ORDER {
            enabled[step.index()] = step.default_enabled();
        }

        let mut reset_done = false;
        for directive in directives {
            match directive {
                Directive::Enable(list) => {
                    if !reset_done {
                        enabled = [false; 7];
                        reset_done = true;
                    }
                    for name in split_step_list(list) {
                        enabled[Step::parse(name)?.index()] = true;
                    }
                }
                Directive::Disable(list) => {
                    for name in split_step_list(list) {
                        enabled[Step::parse(name)?.index()] = false;
                    }
                }
            }
        }

        if install_docker {
            enabled[Step::DockerInstall.index()] = true;
            enabled[Step::ComposeInstall.index()] = true;
        }

        Ok(StepSelection { enabled })
    }

    pub fn is_enabled(&self, step: Step) -> bool {
        self.enabled[step.index()]
    }

    /// Enabled steps in execution order.
    pub fn enabled_steps(&self) -> Vec<Step> {
        Step::EXECUTION_ORDER
            .into_iter()
            .filter(|step| self.is_enabled(*step))
            .collect()
    }

    /// Generation-only selection used by `full-setup` (no install steps).
    pub fn generation_only() -> StepSelection {
        let mut enabled = [false; 7];
        for step in Step::EXECUTION_ORDER {
            enabled[step.index()] = step.default_enabled();
        }
        StepSelection { enabled }
    }
}

fn split_step_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enable(list: &str) -> Directive {
        Directive::Enable(list.to_string())
    }

    fn disable(list: &str) -> Directive {
        Directive::Disable(list.to_string())
    }

    #[test]
    fn default_selection_enables_generation_steps_only() {
        let selection = StepSelection::resolve(&[], false).unwrap();
        assert_eq!(
            selection.enabled_steps(),
            vec![
                Step::Env,
                Step::Secrets,
                Step::Prometheus,
                Step::Alertmanager,
                Step::Rules
            ]
        );
    }

    #[test]
    fn step_then_skip_leaves_only_unskipped_steps() {
        let selection =
            StepSelection::resolve(&[enable("env,secrets"), disable("secrets")], false).unwrap();
        assert_eq!(selection.enabled_steps(), vec![Step::Env]);
    }

    #[test]
    fn skip_then_step_reenables_in_argument_order() {
        let selection =
            StepSelection::resolve(&[disable("env"), enable("env")], false).unwrap();
        assert_eq!(selection.enabled_steps(), vec![Step::Env]);
    }

    #[test]
    fn repeated_step_flags_accumulate_after_first_reset() {
        let selection =
            StepSelection::resolve(&[enable("env"), enable("secrets")], false).unwrap();
        assert_eq!(selection.enabled_steps(), vec![Step::Env, Step::Secrets]);
    }

    #[test]
    fn skip_disables_a_default_step() {
        let selection = StepSelection::resolve(&[disable("prometheus")], false).unwrap();
        assert!(!selection.is_enabled(Step::Prometheus));
        assert!(selection.is_enabled(Step::Alertmanager));
    }

    #[test]
    fn install_docker_flag_forces_install_steps() {
        let selection = StepSelection::resolve(&[enable("env")], true).unwrap();
        assert_eq!(
            selection.enabled_steps(),
            vec![Step::DockerInstall, Step::ComposeInstall, Step::Env]
        );
    }

    #[test]
    fn unknown_step_name_is_reported_with_valid_names() {
        let err = StepSelection::resolve(&[enable("grafana")], false).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unknown step name: grafana"));
        assert!(message.contains("docker-install"));
    }

    #[test]
    fn step_names_round_trip() {
        for step in Step::EXECUTION_ORDER {
            assert_eq!(Step::parse(step.name()).unwrap(), step);
        }
    }
}
