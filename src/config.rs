/// Program identity and environment-driven settings.
use std::env;

/// Set to `1`/`true` to list hidden commands and options in help.
pub const SHOW_HIDDEN_ENV: &str = "MULTITOOL_SHOW_HIDDEN";

/// Default log filter when `--debug` is not given.
pub const LOG_ENV: &str = "MULTITOOL_LOG";

/// What to do when no command name is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoCommandPolicy {
    /// Print root help to stdout and exit 0.
    #[default]
    ShowHelp,
    /// Print root help to stderr and exit 2.
    Error,
}

impl NoCommandPolicy {
    /// Exit status for an invocation without a command.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::ShowHelp => 0,
            Self::Error => 2,
        }
    }
}

/// Static program settings for the root group.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Program name used in usage lines and hints.
    pub name: &'static str,
    /// Version reported by `--version`.
    pub version: &'static str,
    /// Root help text.
    pub about: &'static str,
    /// List hidden commands and options in help.
    pub show_hidden: bool,
    /// Behaviour when no command is given.
    pub no_command: NoCommandPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            about: ROOT_ABOUT,
            show_hidden: false,
            no_command: NoCommandPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with `show_hidden` read from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            show_hidden: env::var(SHOW_HIDDEN_ENV).is_ok_and(|v| truthy(&v)),
            ..Self::default()
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

const ROOT_ABOUT: &str = "\
multitool: one binary, many commands.

To get help on a specific command, use \"multitool COMMAND --help\"
or \"multitool help COMMAND\"; for example, \"multitool help commands\".

Some advanced commands and options are hidden by default. To see them,
run \"MULTITOOL_SHOW_HIDDEN=1 multitool --help\".";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for v in ["1", "true", "YES", " on "] {
            assert!(truthy(v), "{v}");
        }
        for v in ["", "0", "false", "nope"] {
            assert!(!truthy(v), "{v}");
        }
    }

    #[test]
    fn test_policy_exit_codes() {
        assert_eq!(NoCommandPolicy::ShowHelp.exit_code(), 0);
        assert_eq!(NoCommandPolicy::Error.exit_code(), 2);
    }
}
