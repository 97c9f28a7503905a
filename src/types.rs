/// Shared serializable output types.
///
/// These are what gets written to stdout/stderr, either as JSON or rendered as
/// text. They are decoupled from the internal registry and dispatch types.
use serde::{Deserialize, Serialize};

use crate::dispatch::CliError;

/// A registered command in listing form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInfoOutput {
    /// Command name as typed on the command line.
    pub name: String,
    /// One-line help.
    pub help: String,
    /// Whether the command belongs to the platform-restricted subset.
    pub restricted: bool,
    /// Whether the command is hidden from help by default.
    pub hidden: bool,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`snake_case`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Suggested alternatives (similar command names, accepted values).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
    /// What to try next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorOutput {
    /// Construct from a `CliError`. `prog` names the program in hints.
    #[must_use]
    pub fn from_cli_error(err: &CliError, prog: &str) -> Self {
        let help_hint = Some(format!("Try '{prog} --help' for help."));
        let non_empty = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        let (code, message, candidates, hint) = match err {
            CliError::DuplicateCommand { .. } => ("duplicate_command", err.to_string(), None, None),
            CliError::UnknownCommand { candidates, .. } => (
                "unknown_command",
                err.to_string(),
                non_empty(candidates),
                Some(format!("Try '{prog} help' for a list of commands.")),
            ),
            CliError::UnknownOption { .. } => ("unknown_option", err.to_string(), None, help_hint),
            CliError::InvalidOption { valid, .. } => {
                ("invalid_option", err.to_string(), non_empty(valid), help_hint)
            }
            CliError::Usage(_) => ("usage", err.to_string(), None, help_hint),
            CliError::CommandFailed { source, .. } => (
                "command_failed",
                format!("{err}: {source:#}"),
                None,
                None,
            ),
            CliError::CommandPanicked { .. } => ("command_panicked", err.to_string(), None, None),
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message,
                candidates,
                hint,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command_envelope() {
        let err = CliError::UnknownCommand {
            name: "exprt".into(),
            candidates: vec!["export".into()],
        };
        let out = ErrorOutput::from_cli_error(&err, "multitool");
        assert_eq!(out.error.code, "unknown_command");
        assert_eq!(out.error.candidates, Some(vec!["export".to_owned()]));
        assert_eq!(
            out.error.hint.as_deref(),
            Some("Try 'multitool help' for a list of commands.")
        );
    }

    #[test]
    fn test_failure_message_includes_cause() {
        let err = CliError::CommandFailed {
            name: "sysinfo".into(),
            source: anyhow::anyhow!("sw_vers exited with status 1"),
        };
        let out = ErrorOutput::from_cli_error(&err, "multitool");
        assert_eq!(
            out.error.message,
            "Command 'sysinfo' failed: sw_vers exited with status 1"
        );
    }

    #[test]
    fn test_empty_candidates_omitted() {
        let err = CliError::UnknownCommand {
            name: "zzz".into(),
            candidates: vec![],
        };
        let json = serde_json::to_string(&ErrorOutput::from_cli_error(&err, "m")).unwrap();
        assert!(!json.contains("candidates"));
    }
}
