/// Text rendering of a profiling snapshot.
use std::fmt::Write;
use std::time::Duration;

use super::collector::Snapshot;
use super::sort::{SortKey, sort_stats};

/// Render a snapshot as a sorted statistics table.
#[must_use]
pub fn render(mut snapshot: Snapshot, keys: &[SortKey]) -> String {
    sort_stats(&mut snapshot.rows, keys);

    let total = snapshot.total_calls();
    let primitive = snapshot.primitive_calls();
    let mut out = String::new();

    let _ = write!(out, "{total:>9} function calls");
    if total != primitive {
        let _ = write!(out, " ({primitive} primitive calls)");
    }
    let _ = writeln!(out, " in {:.3} seconds", snapshot.elapsed.as_secs_f64());
    let _ = writeln!(out);

    let order: Vec<&str> = keys.iter().map(|k| k.describe()).collect();
    let _ = writeln!(out, "   Ordered by: {}", order.join(", "));
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "   ncalls  tottime  percall  cumtime  percall filename:lineno(function)"
    );
    for row in &snapshot.rows {
        let calls = if row.ncalls == row.pcalls {
            row.ncalls.to_string()
        } else {
            format!("{}/{}", row.ncalls, row.pcalls)
        };
        let _ = writeln!(
            out,
            "{calls:>9} {:>8.3} {:>8.3} {:>8.3} {:>8.3} {}",
            secs(row.tottime),
            per_call(row.tottime, row.ncalls),
            secs(row.cumtime),
            per_call(row.cumtime, row.pcalls),
            row.std_name(),
        );
    }
    out
}

fn secs(d: Duration) -> f64 {
    d.as_secs_f64()
}

#[allow(clippy::cast_precision_loss)]
fn per_call(d: Duration, calls: u64) -> f64 {
    if calls == 0 {
        0.0
    } else {
        d.as_secs_f64() / calls as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FunctionStats;

    fn row(name: &'static str, ncalls: u64, pcalls: u64, cum_ms: u64) -> FunctionStats {
        FunctionStats {
            name,
            file: "root.rs".to_owned(),
            line: 42,
            module: Some("multitool::dispatch::root"),
            ncalls,
            pcalls,
            tottime: Duration::from_millis(cum_ms / 4),
            cumtime: Duration::from_millis(cum_ms),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            rows: vec![row("fast", 2, 2, 10), row("walk", 4, 1, 400)],
            elapsed: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_header_and_order() {
        let text = render(snapshot(), &[SortKey::Cumulative, SortKey::Name]);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("        6 function calls (3 primitive calls) in 0.500 seconds")
        );
        assert!(text.contains("   Ordered by: cumulative time, function name\n"));
        let walk = text.find("root.rs:42(walk)").unwrap();
        let fast = text.find("root.rs:42(fast)").unwrap();
        assert!(walk < fast);
    }

    #[test]
    fn test_recursive_calls_shown_as_ratio() {
        let text = render(snapshot(), &[SortKey::Calls]);
        assert!(text.contains("      4/1    0.100    0.025    0.400    0.400 root.rs:42(walk)"));
        assert!(text.contains("        2    0.002    0.001    0.010    0.005 root.rs:42(fast)"));
    }

    #[test]
    fn test_no_primitive_note_without_recursion() {
        let text = render(
            Snapshot {
                rows: vec![row("fast", 1, 1, 1)],
                elapsed: Duration::ZERO,
            },
            &[SortKey::Time],
        );
        assert!(text.starts_with("        1 function calls in 0.000 seconds\n"));
    }
}
