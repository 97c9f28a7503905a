/// Errors from the command registration and dispatch layer.
use clap::error::{ContextKind, ContextValue, ErrorKind};
use thiserror::Error;

/// Errors that can occur while assembling or dispatching commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Two command units were registered under the same name.
    #[error("Command '{name}' is already registered")]
    DuplicateCommand {
        /// The clashing command name.
        name: String,
    },

    /// No registered command matches the requested name.
    #[error("No such command '{name}'")]
    UnknownCommand {
        /// The unresolved command name.
        name: String,
        /// Registered names that look similar.
        candidates: Vec<String>,
    },

    /// An option was not recognised by the root group or the resolved command.
    #[error("No such option: {token}")]
    UnknownOption {
        /// The offending token as typed.
        token: String,
    },

    /// An option was given a value outside its accepted set.
    #[error("Invalid value '{value}' for '{option}'")]
    InvalidOption {
        /// The option the value was given to.
        option: String,
        /// The rejected value.
        value: String,
        /// Accepted values, when the option has a fixed set.
        valid: Vec<String>,
    },

    /// Any other argument error reported by the parser.
    #[error("{0}")]
    Usage(String),

    /// The command unit returned an error.
    #[error("Command '{name}' failed")]
    CommandFailed {
        /// Name of the failed command.
        name: String,
        /// The unit's own error.
        #[source]
        source: anyhow::Error,
    },

    /// The command unit panicked.
    #[error("Command '{name}' terminated unexpectedly")]
    CommandPanicked {
        /// Name of the faulting command.
        name: String,
    },
}

/// Exit code mapping for `CliError` variants.
impl CliError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownCommand { .. }
            | Self::UnknownOption { .. }
            | Self::InvalidOption { .. }
            | Self::Usage(_) => 2,
            Self::CommandFailed { .. } => 1,
            Self::DuplicateCommand { .. } => 70,
            Self::CommandPanicked { .. } => 101,
        }
    }

    /// Translate a clap parse error into the dispatch taxonomy.
    ///
    /// Help and version requests are not errors and must be handled before
    /// calling this.
    #[must_use]
    pub fn from_clap(err: &clap::Error) -> Self {
        match err.kind() {
            ErrorKind::UnknownArgument => Self::UnknownOption {
                token: context_string(err, ContextKind::InvalidArg).unwrap_or_default(),
            },
            ErrorKind::InvalidValue | ErrorKind::ValueValidation => Self::InvalidOption {
                option: context_string(err, ContextKind::InvalidArg).unwrap_or_default(),
                value: context_string(err, ContextKind::InvalidValue).unwrap_or_default(),
                valid: context_strings(err, ContextKind::ValidValue),
            },
            ErrorKind::InvalidSubcommand => Self::UnknownCommand {
                name: context_string(err, ContextKind::InvalidSubcommand).unwrap_or_default(),
                candidates: context_strings(err, ContextKind::SuggestedSubcommand),
            },
            _ => Self::Usage(summary(&err.render().to_string())),
        }
    }
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(s) => Some(s.clone()),
        ContextValue::StyledStr(s) => Some(s.to_string()),
        ContextValue::Strings(v) => v.first().cloned(),
        _ => None,
    }
}

fn context_strings(err: &clap::Error, kind: ContextKind) -> Vec<String> {
    match err.get(kind) {
        Some(ContextValue::Strings(v)) => v.clone(),
        Some(ContextValue::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// First paragraph of a rendered clap error, folded onto one line.
fn summary(rendered: &str) -> String {
    let text = rendered.strip_prefix("error: ").unwrap_or(rendered);
    text.lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
