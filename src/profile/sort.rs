/// Sort keys for the profiling report.
use std::cmp::Ordering;

use clap::ValueEnum;

use super::stats::FunctionStats;

/// Accepted `--profile-sort` values. Matching is case-sensitive.
///
/// Several keys are aliases of one another (`calls`/`ncalls`,
/// `cumulative`/`cumtime`, `time`/`tottime`, `file`/`filename`/`module`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    /// Call count, descending.
    Calls,
    /// Cumulative time, descending.
    #[default]
    Cumulative,
    /// Cumulative time, descending.
    Cumtime,
    /// File name, ascending.
    File,
    /// File name, ascending.
    Filename,
    /// File name, ascending.
    Module,
    /// Call count, descending.
    Ncalls,
    /// Primitive (non-recursive) call count, descending.
    Pcalls,
    /// Line number, ascending.
    Line,
    /// Span name, ascending.
    Name,
    /// Name, then file, then line, ascending.
    Nfl,
    /// `file:line(name)`, ascending.
    Stdname,
    /// Internal time, descending.
    Time,
    /// Internal time, descending.
    Tottime,
}

impl SortKey {
    /// The spelling accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calls => "calls",
            Self::Cumulative => "cumulative",
            Self::Cumtime => "cumtime",
            Self::File => "file",
            Self::Filename => "filename",
            Self::Module => "module",
            Self::Ncalls => "ncalls",
            Self::Pcalls => "pcalls",
            Self::Line => "line",
            Self::Name => "name",
            Self::Nfl => "nfl",
            Self::Stdname => "stdname",
            Self::Time => "time",
            Self::Tottime => "tottime",
        }
    }

    /// Description used in the report's "Ordered by" line.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Calls | Self::Ncalls => "call count",
            Self::Cumulative | Self::Cumtime => "cumulative time",
            Self::File | Self::Filename | Self::Module => "file name",
            Self::Pcalls => "primitive call count",
            Self::Line => "line number",
            Self::Name => "function name",
            Self::Nfl => "name/file/line",
            Self::Stdname => "standard name",
            Self::Time | Self::Tottime => "internal time",
        }
    }

    /// Order two rows by this key alone.
    #[must_use]
    pub fn compare(self, a: &FunctionStats, b: &FunctionStats) -> Ordering {
        match self {
            Self::Calls | Self::Ncalls => b.ncalls.cmp(&a.ncalls),
            Self::Pcalls => b.pcalls.cmp(&a.pcalls),
            Self::Cumulative | Self::Cumtime => b.cumtime.cmp(&a.cumtime),
            Self::Time | Self::Tottime => b.tottime.cmp(&a.tottime),
            Self::File | Self::Filename | Self::Module => a.file.cmp(&b.file),
            Self::Line => a.line.cmp(&b.line),
            Self::Name => a.name.cmp(b.name),
            Self::Nfl => a
                .name
                .cmp(b.name)
                .then_with(|| a.file.cmp(&b.file))
                .then_with(|| a.line.cmp(&b.line)),
            Self::Stdname => a.std_name().cmp(&b.std_name()),
        }
    }
}

/// Sort rows by a key sequence: first key primary, later keys break ties.
pub fn sort_stats(rows: &mut [FunctionStats], keys: &[SortKey]) {
    rows.sort_by(|a, b| {
        keys.iter()
            .fold(Ordering::Equal, |acc, key| acc.then_with(|| key.compare(a, b)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn row(name: &'static str, file: &str, line: u32, ncalls: u64, cum_ms: u64) -> FunctionStats {
        FunctionStats {
            name,
            file: file.to_owned(),
            line,
            module: None,
            ncalls,
            pcalls: ncalls,
            tottime: Duration::from_millis(cum_ms / 2),
            cumtime: Duration::from_millis(cum_ms),
        }
    }

    fn names(rows: &[FunctionStats]) -> Vec<&'static str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_cumulative_descending() {
        let mut rows = vec![
            row("fast", "a.rs", 1, 1, 5),
            row("slow", "b.rs", 2, 1, 50),
            row("mid", "c.rs", 3, 1, 20),
        ];
        sort_stats(&mut rows, &[SortKey::Cumulative]);
        assert_eq!(names(&rows), vec!["slow", "mid", "fast"]);
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let mut rows = vec![
            row("b", "x.rs", 1, 3, 10),
            row("a", "x.rs", 2, 3, 30),
            row("c", "x.rs", 3, 7, 1),
        ];
        sort_stats(&mut rows, &[SortKey::Calls, SortKey::Name]);
        assert_eq!(names(&rows), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_aliases_agree() {
        let base = vec![
            row("a", "z.rs", 9, 2, 3),
            row("b", "y.rs", 1, 5, 9),
            row("c", "x.rs", 4, 1, 1),
        ];
        for (left, right) in [
            (SortKey::Calls, SortKey::Ncalls),
            (SortKey::Cumulative, SortKey::Cumtime),
            (SortKey::Time, SortKey::Tottime),
            (SortKey::File, SortKey::Module),
        ] {
            let mut l = base.clone();
            let mut r = base.clone();
            sort_stats(&mut l, &[left]);
            sort_stats(&mut r, &[right]);
            assert_eq!(names(&l), names(&r), "{left:?} vs {right:?}");
        }
    }

    #[test]
    fn test_nfl_and_line_ascending() {
        let mut rows = vec![
            row("run", "b.rs", 10, 1, 1),
            row("run", "a.rs", 20, 1, 1),
            row("load", "c.rs", 5, 1, 1),
        ];
        sort_stats(&mut rows, &[SortKey::Nfl]);
        assert_eq!(
            rows.iter().map(|r| r.file.as_str()).collect::<Vec<_>>(),
            vec!["c.rs", "a.rs", "b.rs"]
        );
        sort_stats(&mut rows, &[SortKey::Line]);
        assert_eq!(
            rows.iter().map(|r| r.line).collect::<Vec<_>>(),
            vec![5, 10, 20]
        );
    }

    #[test]
    fn test_cli_spelling_round_trips() {
        for key in SortKey::value_variants() {
            assert_eq!(SortKey::from_str(key.as_str(), false), Ok(*key));
        }
    }
}
