/// `reveal` command: select a file in a Finder window.
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command as Process;

use anyhow::{Context, bail};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::cli::output::write_fields;
use crate::dispatch::{CommandUnit, InvocationContext};

const OPEN: &str = "/usr/bin/open";

/// `multitool reveal PATH`.
pub struct Reveal;

/// Constructor for the registry table.
pub fn unit() -> Box<dyn CommandUnit> {
    Box::new(Reveal)
}

impl CommandUnit for Reveal {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn help(&self) -> &'static str {
        "Reveal a file or folder in Finder"
    }

    fn command(&self) -> Command {
        Command::new(self.name())
            .arg(
                Arg::new("path")
                    .value_name("PATH")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("File or folder to reveal"),
            )
            .arg(
                Arg::new("dry_run")
                    .long("dry-run")
                    .action(ArgAction::SetTrue)
                    .help("Resolve the path and print it without opening Finder"),
            )
    }

    fn run(&self, args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
        let Some(path) = args.get_one::<PathBuf>("path") else {
            bail!("missing PATH");
        };
        let target = resolve(path)?;
        if !args.get_flag("dry_run") {
            open_in_finder(&target)?;
        }
        if ctx.wants_json() {
            let fields = vec![("path".to_owned(), target.display().to_string())];
            write_fields(&mut ctx.out, &fields, ctx.format)?;
        } else {
            writeln!(ctx.out, "{}", target.display())?;
        }
        Ok(0)
    }
}

#[tracing::instrument]
fn resolve(path: &Path) -> anyhow::Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("cannot access '{}'", path.display()))
}

#[tracing::instrument]
fn open_in_finder(target: &Path) -> anyhow::Result<()> {
    let status = Process::new(OPEN)
        .arg("-R")
        .arg(target)
        .status()
        .with_context(|| format!("failed to run {OPEN}"))?;
    if !status.success() {
        bail!("{OPEN} -R exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_path() {
        let err = resolve(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here"));
    }

    #[test]
    fn test_resolve_existing_path_is_absolute() {
        let resolved = resolve(Path::new(".")).unwrap();
        assert!(resolved.is_absolute());
    }
}
