/// Profiling instrumentation: span timing collection and sorted reports.
///
/// A [`ProfileSession`] is armed from the root options, installs a
/// [`ProfileLayer`] into the invocation's subscriber, and renders a report
/// once when stopped. Any span (including `#[tracing::instrument]` functions)
/// entered while collecting shows up as a row.
pub mod collector;
pub mod report;
pub mod session;
pub mod sort;
pub mod stats;

pub use collector::{ProfileLayer, Snapshot};
pub use report::render;
pub use session::{ProfileSession, ProfileState};
pub use sort::{SortKey, sort_stats};
pub use stats::FunctionStats;
