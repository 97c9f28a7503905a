/// Command unit contract and the per-invocation context lent to it.
use std::path::PathBuf;

use clap::ArgMatches;

use super::root::Dispatcher;
use crate::cli::{Output, OutputFormat};

/// A named, self-describing subcommand.
///
/// Units are registered once at startup and never change afterwards. The
/// dispatcher parses the unit's arguments with [`CommandUnit::command`] and
/// then calls [`CommandUnit::run`] with the resulting matches.
pub trait CommandUnit {
    /// Stable command name, unique within a registry.
    fn name(&self) -> &'static str;

    /// One-line help shown in the root command listing.
    fn help(&self) -> &'static str;

    /// Whether the command is left out of generated help unless hidden items are shown.
    fn hidden(&self) -> bool {
        false
    }

    /// Declared flags and positionals.
    ///
    /// The default has none; override to add arguments. Name and help are
    /// applied by the dispatcher, so implementations only need to add args.
    fn command(&self) -> clap::Command {
        clap::Command::new(self.name())
    }

    /// Execute the command.
    ///
    /// Returns the process exit status on completion.
    ///
    /// # Errors
    ///
    /// Any error is reported by the dispatcher and mapped to exit status 1.
    fn run(&self, args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32>;
}

/// State shared between the root dispatcher and the running unit.
pub struct InvocationContext<'a> {
    /// Open library or session handle, if a unit has attached one.
    pub db: Option<PathBuf>,
    /// Effective output format (already resolved from `auto`).
    pub format: OutputFormat,
    /// Set by `--debug`.
    pub debug: bool,
    /// The owning group.
    pub group: &'a Dispatcher,
    /// Standard output for command results.
    pub out: Output,
}

impl InvocationContext<'_> {
    /// Whether results should be emitted as JSON rather than text.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json | OutputFormat::Compact)
    }
}
