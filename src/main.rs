use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod cli;
mod compose;
mod envfile;
mod install;
mod paths;
mod report;
mod secrets;
mod steps;
mod template;

use cli::{CleanArgs, Command, LogsArgs, RootArgs, SetupArgs, StackArgs, StatusArgs};
use compose::{ComposeCommand, StackVerb};
use paths::StackPaths;
use steps::StepSelection;

fn main() -> Result<()> {
    init_tracing();

    // Matches are kept alongside the typed args so `setup` can recover the
    // argument order of its repeatable flags. Parse failures exit 1, the
    // code the controller contract documents for invalid input.
    let matches = match RootArgs::command().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    };
    let args = match RootArgs::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };

    match args.command {
        Command::Build(args) => run_verb(args, StackVerb::Build),
        Command::Up(args) => run_verb(args, StackVerb::Up),
        Command::Down(args) => run_verb(args, StackVerb::Down),
        Command::Restart(args) => run_verb(args, StackVerb::Restart),
        Command::Logs(args) => cmd_logs(args),
        Command::Status(args) => cmd_status(args),
        Command::Clean(args) => cmd_clean(args),
        Command::FullSetup(args) => cmd_full_setup(args),
        Command::Setup(args) => {
            let sub = matches
                .subcommand_matches("setup")
                .ok_or_else(|| anyhow!("setup arguments missing"))?;
            cmd_setup(args, sub)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_verb(args: StackArgs, verb: StackVerb) -> Result<()> {
    let paths = StackPaths::new(args.root);
    let compose = ComposeCommand::resolve()?;
    compose.run_plan(paths.root(), &verb)
}

fn cmd_logs(args: LogsArgs) -> Result<()> {
    let paths = StackPaths::new(args.root);
    let compose = ComposeCommand::resolve()?;
    compose.run_plan(
        paths.root(),
        &StackVerb::Logs {
            follow: args.follow,
            service: args.service,
        },
    )
}

fn cmd_status(args: StatusArgs) -> Result<()> {
    let paths = StackPaths::new(args.root);
    let compose = ComposeCommand::resolve()?;
    if !args.json {
        return compose.run_plan(paths.root(), &StackVerb::Status);
    }

    let mut ps_output = String::new();
    for invocation in compose::plan(&StackVerb::Status) {
        ps_output.push_str(&compose.run_captured(paths.root(), &invocation)?);
    }
    let report = report::collect(&paths, ps_output);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_clean(args: CleanArgs) -> Result<()> {
    if !args.yes {
        print!("This removes the stack containers and volumes. Continue? [y/N]: ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        // Declining is a successful no-op, not an error.
        if !is_affirmative(&answer) {
            println!("Aborted.");
            return Ok(());
        }
    }

    let paths = StackPaths::new(args.root);
    let compose = ComposeCommand::resolve()?;
    compose.run_plan(paths.root(), &StackVerb::Clean)?;
    println!("Stack containers and volumes removed.");
    Ok(())
}

fn cmd_setup(args: SetupArgs, matches: &clap::ArgMatches) -> Result<()> {
    let directives = cli::setup_directives(matches)?;
    let selection = StepSelection::resolve(&directives, args.install_docker)?;
    if selection.enabled_steps().is_empty() {
        println!("No steps enabled; nothing to do.");
        return Ok(());
    }
    bootstrap::run(&StackPaths::new(args.root), &selection)
}

fn cmd_full_setup(args: StackArgs) -> Result<()> {
    let paths = StackPaths::new(args.root);
    bootstrap::run(&paths, &StepSelection::generation_only())?;

    let compose = ComposeCommand::resolve()?;
    compose.run_plan(paths.root(), &StackVerb::Build)?;
    compose.run_plan(paths.root(), &StackVerb::Up)?;
    println!("Stack is up. Service ports are defined in .env.");
    Ok(())
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    )
}
