//! CLI argument parsing for the stack controller and bootstrapper.
//!
//! The CLI is intentionally thin: verbs map to compose plans and `setup`
//! flags map to a step selection, with no policy hidden in the parser.
use anyhow::Result;
use clap::{ArgMatches, Parser, Subcommand};
use std::path::PathBuf;

use crate::steps::Directive;

/// Root CLI entrypoint for the monitoring stack.
#[derive(Parser, Debug)]
#[command(
    name = "monstack",
    version,
    about = "Controller and environment bootstrapper for the monitoring stack",
    after_help = "Examples:\n  monstack setup                         Generate .env, secrets, and configs\n  monstack setup --step=env,secrets      Run only the listed steps\n  monstack setup --skip=rules            Run the default steps minus one\n  monstack setup --install-docker        Also install docker and compose\n  monstack full-setup                    Generate everything, then build and start\n  monstack up                            Start the stack detached\n  monstack status --json                 Machine-readable stack status\n  monstack clean                         Tear down containers and volumes (asks first)",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level verbs.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the stack images
    Build(StackArgs),
    /// Start the stack detached
    Up(StackArgs),
    /// Stop the stack
    Down(StackArgs),
    /// Stop then start the stack
    Restart(StackArgs),
    /// Show stack logs
    Logs(LogsArgs),
    /// Show stack status
    Status(StatusArgs),
    /// Tear down containers and volumes (asks for confirmation)
    Clean(CleanArgs),
    /// Run all generation steps, then build and start the stack
    FullSetup(StackArgs),
    /// Generate .env, secrets, and config files from templates
    Setup(SetupArgs),
}

/// Shared inputs for verbs that only need the stack root.
#[derive(Parser, Debug)]
pub struct StackArgs {
    /// Stack root holding docker-compose.yml, templates/, and generated files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Show stack logs")]
pub struct LogsArgs {
    /// Stack root holding docker-compose.yml, templates/, and generated files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Follow log output
    #[arg(long, short = 'f')]
    pub follow: bool,

    /// Limit logs to one service
    #[arg(value_name = "SERVICE")]
    pub service: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Show stack status")]
pub struct StatusArgs {
    /// Stack root holding docker-compose.yml, templates/, and generated files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Tear down containers and volumes")]
pub struct CleanArgs {
    /// Stack root holding docker-compose.yml, templates/, and generated files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Generate .env, secrets, and config files from templates")]
pub struct SetupArgs {
    /// Stack root holding docker-compose.yml, templates/, and generated files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Force-enable the docker and compose install steps
    #[arg(long)]
    pub install_docker: bool,

    // The step/skip values are not read from these fields: `setup_directives`
    // pulls them out of `ArgMatches` instead, which keeps the argv order the
    // typed vectors lose. The fields exist to declare the args and help text.
    /// Enable only the listed steps (comma-separated; repeatable)
    #[arg(long = "step", value_name = "LIST")]
    pub step: Vec<String>,

    /// Disable the listed steps (comma-separated; repeatable)
    #[arg(long = "skip", value_name = "LIST")]
    pub skip: Vec<String>,
}

/// Reconstruct `--step`/`--skip` directives in argument order.
///
/// Clap hands the two flags back as separate vectors; the argv indices put
/// them back into one left-to-right sequence so later flags win.
pub fn setup_directives(matches: &ArgMatches) -> Result<Vec<Directive>> {
    let mut indexed: Vec<(usize, Directive)> = Vec::new();
    collect_indexed(matches, "step", Directive::Enable, &mut indexed);
    collect_indexed(matches, "skip", Directive::Disable, &mut indexed);
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, directive)| directive).collect())
}

fn collect_indexed(
    matches: &ArgMatches,
    id: &str,
    make: fn(String) -> Directive,
    out: &mut Vec<(usize, Directive)>,
) {
    let (Some(values), Some(indices)) = (matches.get_many::<String>(id), matches.indices_of(id))
    else {
        return;
    };
    for (value, index) in values.zip(indices) {
        out.push((index, make(value.clone())));
    }
}
