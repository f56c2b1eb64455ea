//! Straight-line execution of the enabled bootstrap steps.
//!
//! There is no dependency graph and no recovery: steps run in the fixed
//! order, each one either succeeds or aborts the whole run. Substitution
//! steps read `.env` from disk, whether it was written earlier in the same
//! run or by a previous one.
use anyhow::{Context, Result};

use crate::envfile;
use crate::install;
use crate::paths::StackPaths;
use crate::secrets;
use crate::steps::{Step, StepSelection};
use crate::template;

/// Template file name and output file name for each substitution step.
fn render_job(step: Step) -> Option<(&'static str, &'static str)> {
    match step {
        Step::Prometheus => Some(("prometheus.yml.template", "prometheus.yml")),
        Step::Alertmanager => Some(("alertmanager.yml.template", "alertmanager.yml")),
        Step::Rules => Some(("alert_rules.yml.template", "alert_rules.yml")),
        _ => None,
    }
}

/// Run every enabled step in execution order, failing fast on the first error.
pub fn run(paths: &StackPaths, selection: &StepSelection) -> Result<()> {
    for step in Step::EXECUTION_ORDER {
        if !selection.is_enabled(step) {
            tracing::debug!(step = step.name(), "step disabled, skipping");
            continue;
        }
        tracing::info!(step = step.name(), "running step");
        execute(paths, step).with_context(|| format!("step {}", step.name()))?;
        println!("[setup] {} done", step.name());
    }
    Ok(())
}

fn execute(paths: &StackPaths, step: Step) -> Result<()> {
    match step {
        Step::DockerInstall => install::ensure_docker(),
        Step::ComposeInstall => install::ensure_compose(),
        Step::Env => envfile::generate(paths),
        Step::Secrets => secrets::materialize(paths),
        Step::Prometheus | Step::Alertmanager | Step::Rules => {
            let Some((template_name, output_name)) = render_job(step) else {
                return Ok(());
            };
            let vars = envfile::load(&paths.env_file())?;
            template::render_file(
                &paths.template(template_name),
                &paths.generated(output_name),
                &vars,
            )
        }
    }
}
