/// Output streams and formatting: JSON, table, TTY detection.
use std::cell::RefCell;
use std::io::{self, IsTerminal, Write};
use std::rc::Rc;

use comfy_table::{Table, presets::UTF8_BORDERS_ONLY};
use serde::Serialize;

use super::args::OutputFormat;
use crate::types::{CommandInfoOutput, ErrorOutput};

/// Resolve the effective output format, handling `--json` flag and TTY auto-detection.
#[must_use]
pub fn resolve_format(fmt: OutputFormat, json_flag: bool) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    if fmt == OutputFormat::Auto {
        if io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        fmt
    }
}

enum Sink {
    Stdout,
    Stderr,
    Buffer(Vec<u8>),
}

/// A cloneable handle to an output stream.
///
/// Clones share the same underlying sink, so a handle captured by an exit
/// hook writes to the same place as the one lent to the running command.
#[derive(Clone)]
pub struct Output {
    sink: Rc<RefCell<Sink>>,
}

impl Output {
    fn new(sink: Sink) -> Self {
        Self {
            sink: Rc::new(RefCell::new(sink)),
        }
    }

    /// Process standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Sink::Stdout)
    }

    /// Process standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Sink::Stderr)
    }

    /// An in-memory buffer, read back with [`Output::contents`].
    #[must_use]
    pub fn buffer() -> Self {
        Self::new(Sink::Buffer(Vec::new()))
    }

    /// Everything written so far, for buffer sinks. Empty for process streams.
    #[must_use]
    pub fn contents(&self) -> String {
        match &*self.sink.borrow() {
            Sink::Buffer(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Sink::Stdout | Sink::Stderr => String::new(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout => io::stdout().lock().write(buf),
            Sink::Stderr => io::stderr().lock().write(buf),
            Sink::Buffer(bytes) => bytes.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout => io::stdout().lock().flush(),
            Sink::Stderr => io::stderr().lock().flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}

// --- Command listing ---

/// Write the registered command list.
///
/// # Errors
///
/// Returns any I/O error from the sink.
pub fn write_commands(
    out: &mut impl Write,
    commands: &[CommandInfoOutput],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => print_json(out, commands),
        OutputFormat::Compact => print_compact_json(out, commands),
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(["COMMAND", "DESCRIPTION", "RESTRICTED", "HIDDEN"]);
            for c in commands {
                table.add_row([
                    c.name.as_str(),
                    c.help.as_str(),
                    if c.restricted { "yes" } else { "" },
                    if c.hidden { "yes" } else { "" },
                ]);
            }
            writeln!(out, "{table}")
        }
    }
}

/// Write `key: value` pairs as a two-column table or a JSON object.
///
/// # Errors
///
/// Returns any I/O error from the sink.
pub fn write_fields(
    out: &mut impl Write,
    fields: &[(String, String)],
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Compact => {
            let map: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            if format == OutputFormat::Json {
                print_json(out, &map)
            } else {
                print_compact_json(out, &map)
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            for (key, value) in fields {
                table.add_row([key.as_str(), value.as_str()]);
            }
            writeln!(out, "{table}")
        }
    }
}

// --- Error output ---

/// Write a structured error, JSON or plain text depending on `format`.
///
/// Write failures are ignored: there is nowhere left to report them.
pub fn write_error(err_out: &mut impl Write, err: &ErrorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json | OutputFormat::Compact => {
            let s = serde_json::to_string_pretty(err).unwrap_or_default();
            let _ = writeln!(err_out, "{s}");
        }
        OutputFormat::Table | OutputFormat::Auto => {
            let _ = writeln!(err_out, "Error: {}", err.error.message);
            if let Some(candidates) = &err.error.candidates {
                let _ = writeln!(err_out, "  Did you mean one of these?");
                for c in candidates {
                    let _ = writeln!(err_out, "    {c}");
                }
            }
            if let Some(hint) = &err.error.hint {
                let _ = writeln!(err_out, "{hint}");
            }
        }
    }
}

// --- Generic JSON helpers ---

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> io::Result<()> {
    let s = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(out, "{s}")
}

fn print_compact_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> io::Result<()> {
    let s = serde_json::to_string(value).map_err(io::Error::other)?;
    writeln!(out, "{s}")
}
