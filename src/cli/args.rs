/// Root-level option definitions via clap derive.
use clap::{ArgAction, Args, ValueEnum};
use tracing_subscriber::filter::Directive;

use crate::profile::SortKey;

/// Options attached to the root group, parsed before the command name.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Output format. Auto-detects: table when TTY, json when piped.
    #[arg(long, value_name = "FORMAT", default_value = "auto")]
    pub output: OutputFormat,

    /// Shorthand for --output json.
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    #[command(flatten)]
    pub debug: DebugArgs,

    /// Enable profiling.
    #[arg(long)]
    pub profile: bool,

    /// Sort profiler output by SORT_KEY. Can be given multiple times; later keys
    /// break ties left by earlier ones. Default: cumulative.
    #[arg(long = "profile-sort", value_name = "SORT_KEY", action = ArgAction::Append)]
    pub profile_sort: Vec<SortKey>,
}

impl GlobalArgs {
    /// Root option ids hidden from help unless hidden items are shown.
    pub const HIDDEN: &'static [&'static str] = &["profile", "profile_sort", "watch"];

    /// Sort keys to use, falling back to the default key.
    #[must_use]
    pub fn sort_keys(&self) -> Vec<SortKey> {
        if self.profile_sort.is_empty() {
            vec![SortKey::default()]
        } else {
            self.profile_sort.clone()
        }
    }
}

/// Debug toggles consumed by the logging layer.
#[derive(Debug, Clone, Default, Args)]
pub struct DebugArgs {
    /// Enable debug output on stderr.
    #[arg(long)]
    pub debug: bool,

    /// Trace spans and events for TARGET (a module path such as
    /// `multitool::commands`). Can be given multiple times.
    #[arg(long, value_name = "TARGET", action = ArgAction::Append, value_parser = parse_watch_target)]
    pub watch: Vec<String>,
}

/// Output format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Auto-detect: table when stdout is a TTY, json when piped.
    #[default]
    Auto,
    /// JSON (pretty-printed).
    Json,
    /// Compact single-line JSON.
    Compact,
    /// Aligned table / plain text (human-readable).
    Table,
}

/// Accept a `--watch` target only if it forms a valid filter directive.
fn parse_watch_target(target: &str) -> Result<String, String> {
    let target = target.trim();
    if target.is_empty() || target.contains('=') {
        return Err("expected a tracing target such as 'multitool::dispatch'".to_owned());
    }
    format!("{target}=trace")
        .parse::<Directive>()
        .map(|_| target.to_owned())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Command, FromArgMatches};

    fn parse(argv: &[&str]) -> Result<GlobalArgs, clap::Error> {
        let cmd = GlobalArgs::augment_args(Command::new("prog"));
        let matches = cmd.try_get_matches_from(argv.iter().copied())?;
        GlobalArgs::from_arg_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["prog"]).unwrap();
        assert!(!args.profile);
        assert_eq!(args.sort_keys(), vec![SortKey::Cumulative]);
        assert_eq!(args.output, OutputFormat::Auto);
    }

    #[test]
    fn test_repeated_sort_keys_keep_order() {
        let args = parse(&[
            "prog",
            "--profile",
            "--profile-sort",
            "tottime",
            "--profile-sort",
            "name",
        ])
        .unwrap();
        assert_eq!(args.sort_keys(), vec![SortKey::Tottime, SortKey::Name]);
    }

    #[test]
    fn test_sort_key_case_sensitive() {
        let err = parse(&["prog", "--profile-sort", "Cumulative"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_watch_validation() {
        let args = parse(&["prog", "--watch", "multitool::dispatch"]).unwrap();
        assert_eq!(args.debug.watch, vec!["multitool::dispatch".to_owned()]);
        assert!(parse(&["prog", "--watch", "a=b"]).is_err());
    }
}
