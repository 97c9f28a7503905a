/// Per-callsite timing statistics.
use std::path::Path;
use std::time::Duration;

use tracing::Metadata;

/// Accumulated timings for one span callsite.
#[derive(Debug, Clone)]
pub struct FunctionStats {
    /// Span name (the function name for `#[instrument]` spans).
    pub name: &'static str,
    /// Source file, reduced to its base name.
    pub file: String,
    /// Source line, 0 when unknown.
    pub line: u32,
    /// Module path of the callsite.
    pub module: Option<&'static str>,
    /// Total number of enter/exit pairs.
    pub ncalls: u64,
    /// Calls that were not nested inside another call of the same callsite.
    pub pcalls: u64,
    /// Time spent in the span itself, excluding child spans.
    pub tottime: Duration,
    /// Time spent in the span including children, counted for primitive calls.
    pub cumtime: Duration,
}

impl FunctionStats {
    /// Empty statistics for a callsite.
    #[must_use]
    pub fn new(meta: &'static Metadata<'static>) -> Self {
        Self {
            name: meta.name(),
            file: meta.file().map_or_else(|| "~".to_owned(), strip_dirs),
            line: meta.line().unwrap_or(0),
            module: meta.module_path(),
            ncalls: 0,
            pcalls: 0,
            tottime: Duration::ZERO,
            cumtime: Duration::ZERO,
        }
    }

    /// `file:line(name)`, the canonical row label.
    #[must_use]
    pub fn std_name(&self) -> String {
        format!("{}:{}({})", self.file, self.line, self.name)
    }
}

/// Reduce a source path to its final component.
#[must_use]
pub fn strip_dirs(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_owned(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_dirs() {
        assert_eq!(strip_dirs("src/dispatch/root.rs"), "root.rs");
        assert_eq!(strip_dirs("/abs/path/lib.rs"), "lib.rs");
        assert_eq!(strip_dirs("main.rs"), "main.rs");
    }
}
