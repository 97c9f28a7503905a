/// Root dispatcher: parses root options, resolves the command, runs it.
use std::ffi::OsString;
use std::io::Write;
use std::iter;
use std::panic::{self, AssertUnwindSafe};

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches, value_parser};

use super::errors::CliError;
use super::hooks::ExitHooks;
use super::registry::CommandRegistry;
use super::suggest::suggest;
use super::unit::{CommandUnit, InvocationContext};
use crate::cli::{GlobalArgs, Output, OutputFormat, resolve_format, write_error};
use crate::config::{AppConfig, NoCommandPolicy};
use crate::logging;
use crate::profile::{ProfileSession, ProfileState};
use crate::types::ErrorOutput;

/// Id of the catch-all positional on listing stubs.
const FORWARDED: &str = "args";

/// Id clap gives the values of an external subcommand.
const EXTERNAL: &str = "";

/// The root group: owns the registry and dispatches one invocation at a time.
pub struct Dispatcher {
    config: AppConfig,
    registry: CommandRegistry,
    out: Output,
    err: Output,
}

impl Dispatcher {
    /// A dispatcher writing to the process stdout/stderr.
    #[must_use]
    pub fn new(config: AppConfig, registry: CommandRegistry) -> Self {
        Self {
            config,
            registry,
            out: Output::stdout(),
            err: Output::stderr(),
        }
    }

    /// Redirect command output and diagnostics.
    #[must_use]
    pub fn with_streams(mut self, out: Output, err: Output) -> Self {
        self.out = out;
        self.err = err;
        self
    }

    /// Program settings.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The registered commands.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The root command as used for parsing and help.
    ///
    /// Each unit appears as a listing stub that forwards its arguments
    /// untouched; the unit's own flags are parsed after root setup.
    #[must_use]
    pub fn root_command(&self) -> Command {
        let show_hidden = self.config.show_hidden;
        let mut root = GlobalArgs::augment_args(
            Command::new(self.config.name)
                .version(self.config.version)
                .about(self.config.about)
                .disable_help_subcommand(true)
                .allow_external_subcommands(true)
                .external_subcommand_value_parser(value_parser!(OsString))
                .subcommand_value_name("COMMAND")
                .subcommand_help_heading("Commands"),
        );
        for id in GlobalArgs::HIDDEN {
            root = root.mut_arg(*id, |arg| arg.hide(!show_hidden));
        }
        root.subcommands(
            self.registry
                .all()
                .map(|unit| listing_stub(unit, show_hidden)),
        )
    }

    /// The full command for a unit, with its declared flags.
    #[must_use]
    pub fn unit_command(&self, unit: &dyn CommandUnit) -> Command {
        unit.command()
            .name(unit.name())
            .about(unit.help())
            .bin_name(format!("{} {}", self.config.name, unit.name()))
    }

    /// Rendered help for the root group, or for one command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::UnknownCommand` if `name` is not registered.
    pub fn render_help(&self, name: Option<&str>) -> Result<String, CliError> {
        let Some(name) = name else {
            return Ok(self.root_command().render_help().to_string());
        };
        let unit = self
            .registry
            .get(name)
            .ok_or_else(|| self.unknown_command(name))?;
        Ok(self.unit_command(unit).render_long_help().to_string())
    }

    /// Build an `UnknownCommand` error with suggestions.
    ///
    /// Hidden commands are only suggested when hidden items are shown.
    #[must_use]
    pub fn unknown_command(&self, name: &str) -> CliError {
        let listed: Vec<&str> = self
            .registry
            .all()
            .filter(|unit| self.config.show_hidden || !unit.hidden())
            .map(CommandUnit::name)
            .collect();
        CliError::UnknownCommand {
            name: name.to_owned(),
            candidates: suggest(&listed, name),
        }
    }

    /// Run one invocation and return its exit status.
    ///
    /// `argv` includes the program name. Root options are parsed first; help,
    /// version and option errors return before any command is touched. Once
    /// setup is done, exit hooks are guaranteed to run before this returns.
    pub fn dispatch<I, T>(&self, argv: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let matches = match self.root_command().try_get_matches_from(argv.iter().cloned()) {
            Ok(matches) => matches,
            Err(e) => return self.parse_failure(&e, OutputFormat::Table),
        };
        let globals = match GlobalArgs::from_arg_matches(&matches) {
            Ok(globals) => globals,
            Err(e) => return self.parse_failure(&e, OutputFormat::Table),
        };
        let format = resolve_format(globals.output, globals.json);

        let session = if globals.profile {
            ProfileSession::arm(globals.sort_keys())
        } else {
            ProfileSession::disarmed()
        };
        let subscriber = match logging::subscriber(&globals.debug, session.start()) {
            Ok(subscriber) => subscriber,
            Err(e) => return self.fail(&CliError::Usage(e.to_string()), format),
        };
        let _log_guard = tracing::subscriber::set_default(subscriber);

        let mut hooks = ExitHooks::new();
        if session.state() == ProfileState::Collecting {
            self.announce_profiling(&session, &mut hooks);
        }
        let (mut out, mut err) = (self.out.clone(), self.err.clone());
        hooks.register("flush-streams", move || {
            out.flush()?;
            err.flush()?;
            Ok(())
        });

        let status = self.resolve_and_run(&argv, &matches, &globals, format);
        hooks.run_all();
        status
    }

    fn announce_profiling(&self, session: &ProfileSession, hooks: &mut ExitHooks) {
        let order: Vec<&str> = session.sort_keys().iter().map(|k| k.as_str()).collect();
        let mut out = self.out.clone();
        let _ = writeln!(out, "Profiling...");
        let _ = writeln!(out, "Profile sort order: {}", order.join(", "));

        let session = session.clone();
        hooks.register("profile-report", move || {
            let Some(report) = session.report() else {
                return Ok(());
            };
            writeln!(out, "Profiling completed")?;
            write!(out, "{report}")?;
            Ok(())
        });
    }

    fn resolve_and_run(
        &self,
        argv: &[OsString],
        matches: &ArgMatches,
        globals: &GlobalArgs,
        format: OutputFormat,
    ) -> i32 {
        let _span = tracing::info_span!("dispatch").entered();

        let Some((name, sub)) = matches.subcommand() else {
            return self.no_command();
        };
        let Some(unit) = self.registry.get(name) else {
            return self.fail(&self.unknown_command(name), format);
        };

        let forwarded = self.forwarded_args(argv, name, sub);
        let unit_argv = iter::once(OsString::from(name)).chain(forwarded);
        let args = match self.unit_command(unit).try_get_matches_from(unit_argv) {
            Ok(args) => args,
            Err(e) => return self.parse_failure(&e, format),
        };

        let mut ctx = InvocationContext {
            db: None,
            format,
            debug: globals.debug.debug,
            group: self,
            out: self.out.clone(),
        };
        tracing::debug!(command = name, "dispatching");
        let outcome = {
            let _span = tracing::info_span!("run", command = name).entered();
            panic::catch_unwind(AssertUnwindSafe(|| unit.run(&args, &mut ctx)))
        };
        match outcome {
            Ok(Ok(status)) => status,
            // Units may surface dispatch errors (e.g. `help` on an unknown name) as-is.
            Ok(Err(source)) => match source.downcast::<CliError>() {
                Ok(err) => self.fail(&err, format),
                Err(source) => self.fail(
                    &CliError::CommandFailed {
                        name: name.to_owned(),
                        source,
                    },
                    format,
                ),
            },
            Err(_) => self.fail(
                &CliError::CommandPanicked {
                    name: name.to_owned(),
                },
                format,
            ),
        }
    }

    /// Everything after the command name, exactly as typed.
    ///
    /// The name is the first token equal to `name` whose preceding tokens
    /// parse as root options alone, so a root option value that happens to
    /// equal the name is skipped.
    fn forwarded_args(&self, argv: &[OsString], name: &str, sub: &ArgMatches) -> Vec<OsString> {
        let root_options = GlobalArgs::augment_args(Command::new(self.config.name));
        let position = (1..argv.len()).find(|&i| {
            argv[i] == name
                && root_options
                    .clone()
                    .try_get_matches_from(argv[..i].iter().cloned())
                    .is_ok()
        });
        if let Some(i) = position {
            return argv[i + 1..].to_vec();
        }
        [FORWARDED, EXTERNAL]
            .into_iter()
            .find_map(|id| sub.try_get_many::<OsString>(id).ok().flatten())
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn no_command(&self) -> i32 {
        let policy = self.config.no_command;
        let mut sink = match policy {
            NoCommandPolicy::ShowHelp => self.out.clone(),
            NoCommandPolicy::Error => self.err.clone(),
        };
        let _ = write!(sink, "{}", self.root_command().render_help());
        policy.exit_code()
    }

    /// Help and version requests print and succeed; everything else is an error.
    fn parse_failure(&self, e: &clap::Error, format: OutputFormat) -> i32 {
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = write!(self.out.clone(), "{}", e.render());
                0
            }
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = write!(self.err.clone(), "{}", e.render());
                2
            }
            _ => self.fail(&CliError::from_clap(e), format),
        }
    }

    fn fail(&self, err: &CliError, format: OutputFormat) -> i32 {
        tracing::debug!(error = %err, "invocation failed");
        let output = ErrorOutput::from_cli_error(err, self.config.name);
        write_error(&mut self.err.clone(), &output, format);
        err.exit_code()
    }
}

/// Root-level entry for a unit: name and help for listing, arguments passed through.
fn listing_stub(unit: &dyn CommandUnit, show_hidden: bool) -> Command {
    Command::new(unit.name())
        .about(unit.help())
        .hide(unit.hidden() && !show_hidden)
        .disable_help_flag(true)
        .arg(
            Arg::new(FORWARDED)
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .action(ArgAction::Append)
                .value_parser(value_parser!(OsString)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl CommandUnit for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn help(&self) -> &'static str {
            "Print arguments"
        }

        fn command(&self) -> Command {
            Command::new("echo").arg(Arg::new("words").num_args(0..))
        }

        fn run(&self, args: &ArgMatches, ctx: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
            let words: Vec<String> = args
                .get_many::<String>("words")
                .into_iter()
                .flatten()
                .cloned()
                .collect();
            writeln!(ctx.out, "{}", words.join(" "))?;
            Ok(0)
        }
    }

    struct Secret;

    impl CommandUnit for Secret {
        fn name(&self) -> &'static str {
            "secret"
        }

        fn help(&self) -> &'static str {
            "Hidden helper"
        }

        fn hidden(&self) -> bool {
            true
        }

        fn run(&self, _: &ArgMatches, _: &mut InvocationContext<'_>) -> anyhow::Result<i32> {
            Ok(0)
        }
    }

    fn dispatcher(show_hidden: bool) -> (Dispatcher, Output) {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(Echo)).unwrap();
        registry.register(Box::new(Secret)).unwrap();
        let config = AppConfig {
            show_hidden,
            ..AppConfig::default()
        };
        let out = Output::buffer();
        let d = Dispatcher::new(config, registry).with_streams(out.clone(), Output::buffer());
        (d, out)
    }

    #[test]
    fn verify_root_command() {
        dispatcher(false).0.root_command().debug_assert();
    }

    #[test]
    fn test_forwards_args() {
        let (d, out) = dispatcher(false);
        assert_eq!(d.dispatch(["multitool", "echo", "a", "b"]), 0);
        assert_eq!(out.contents(), "a b\n");
    }

    #[test]
    fn test_forwards_leading_separator() {
        let (d, out) = dispatcher(false);
        assert_eq!(d.dispatch(["multitool", "echo", "--", "-x"]), 0);
        assert_eq!(out.contents(), "-x\n");
    }

    #[test]
    fn test_root_separator_before_command() {
        let (d, out) = dispatcher(false);
        assert_eq!(d.dispatch(["multitool", "--", "echo", "x"]), 0);
        assert_eq!(out.contents(), "x\n");
    }

    #[test]
    fn test_root_separator_before_unknown_command() {
        let (d, _) = dispatcher(false);
        assert_eq!(d.dispatch(["multitool", "--", "nope"]), 2);
    }

    #[test]
    fn test_root_option_value_equal_to_command_name() {
        let (d, out) = dispatcher(false);
        assert_eq!(d.dispatch(["multitool", "--watch", "echo", "echo", "y"]), 0);
        assert_eq!(out.contents(), "y\n");
    }

    #[test]
    fn test_suggestions_skip_hidden_commands() {
        let (hidden, _) = dispatcher(false);
        match hidden.unknown_command("secrt") {
            CliError::UnknownCommand { candidates, .. } => {
                assert!(!candidates.contains(&"secret".to_owned()), "{candidates:?}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let (shown, _) = dispatcher(true);
        match shown.unknown_command("secrt") {
            CliError::UnknownCommand { candidates, .. } => {
                assert!(candidates.contains(&"secret".to_owned()), "{candidates:?}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_hidden_listing_follows_config() {
        let (hidden, _) = dispatcher(false);
        let help = hidden.render_help(None).unwrap();
        assert!(help.contains("echo"));
        assert!(!help.contains("secret"));
        assert!(!help.contains("--profile"));

        let (shown, _) = dispatcher(true);
        let help = shown.render_help(None).unwrap();
        assert!(help.contains("secret"));
        assert!(help.contains("--profile-sort"));
    }

    #[test]
    fn test_hidden_command_still_dispatches() {
        let (d, _) = dispatcher(false);
        assert_eq!(d.dispatch(["multitool", "secret"]), 0);
    }

    #[test]
    fn test_unit_help_names_program() {
        let (d, _) = dispatcher(false);
        let help = d.render_help(Some("echo")).unwrap();
        assert!(help.contains("multitool echo"));
        assert!(matches!(
            d.render_help(Some("nope")),
            Err(CliError::UnknownCommand { .. })
        ));
    }
}
