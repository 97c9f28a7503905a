/// Span timing collector, installed as a `tracing-subscriber` layer.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::callsite::Identifier;
use tracing::{Metadata, Subscriber, span};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use super::session::ProfileState;
use super::stats::FunctionStats;

struct Frame {
    span: span::Id,
    callsite: Identifier,
    meta: &'static Metadata<'static>,
    entered: Instant,
    children: Duration,
}

/// Everything collected by one profiling session.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// One row per span callsite, unsorted.
    pub rows: Vec<FunctionStats>,
    /// Wall time from the start of collection to the stop.
    pub elapsed: Duration,
}

impl Snapshot {
    /// Sum of `ncalls` over all rows.
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.rows.iter().map(|r| r.ncalls).sum()
    }

    /// Sum of `pcalls` over all rows.
    #[must_use]
    pub fn primitive_calls(&self) -> u64 {
        self.rows.iter().map(|r| r.pcalls).sum()
    }
}

/// Session state plus the open-span stack and accumulated rows.
pub(crate) struct Collector {
    pub(crate) state: ProfileState,
    started: Option<Instant>,
    stack: Vec<Frame>,
    stats: HashMap<Identifier, FunctionStats>,
}

impl Collector {
    pub(crate) fn new(state: ProfileState) -> Self {
        Self {
            state,
            started: None,
            stack: Vec::new(),
            stats: HashMap::new(),
        }
    }

    pub(crate) fn start(&mut self, now: Instant) {
        self.state = ProfileState::Collecting;
        self.started = Some(now);
    }

    fn enter(&mut self, id: &span::Id, meta: &'static Metadata<'static>, now: Instant) {
        if self.state != ProfileState::Collecting {
            return;
        }
        self.stack.push(Frame {
            span: id.clone(),
            callsite: meta.callsite(),
            meta,
            entered: now,
            children: Duration::ZERO,
        });
    }

    fn exit(&mut self, id: &span::Id, now: Instant) {
        if self.state != ProfileState::Collecting {
            return;
        }
        // Spans normally exit in LIFO order; tolerate the odd out-of-order exit.
        let Some(pos) = self.stack.iter().rposition(|f| f.span == *id) else {
            return;
        };
        let frame = self.stack.remove(pos);
        self.close(frame, pos, now);
    }

    fn close(&mut self, frame: Frame, pos: usize, now: Instant) {
        let elapsed = now.saturating_duration_since(frame.entered);
        if let Some(parent) = pos.checked_sub(1).and_then(|p| self.stack.get_mut(p)) {
            parent.children += elapsed;
        }

        let recursive = self.stack.iter().any(|f| f.callsite == frame.callsite);
        let entry = self
            .stats
            .entry(frame.callsite)
            .or_insert_with(|| FunctionStats::new(frame.meta));
        entry.ncalls += 1;
        entry.tottime += elapsed.saturating_sub(frame.children);
        if !recursive {
            entry.pcalls += 1;
            entry.cumtime += elapsed;
        }
    }

    /// Stop collecting. Spans still open are closed at `now`.
    pub(crate) fn stop(&mut self, now: Instant) -> Snapshot {
        while let Some(frame) = self.stack.pop() {
            let pos = self.stack.len();
            self.close(frame, pos, now);
        }
        self.state = ProfileState::Reported;
        Snapshot {
            rows: self.stats.drain().map(|(_, row)| row).collect(),
            elapsed: self
                .started
                .map_or(Duration::ZERO, |t| now.saturating_duration_since(t)),
        }
    }
}

/// Layer that feeds span enter/exit events into a [`Collector`].
///
/// Runs on the same call stack as the code being measured; there is no
/// sampling thread.
pub struct ProfileLayer {
    collector: Arc<Mutex<Collector>>,
}

impl ProfileLayer {
    pub(crate) fn new(collector: Arc<Mutex<Collector>>) -> Self {
        Self { collector }
    }
}

impl<S> Layer<S> for ProfileLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_enter(&self, id: &span::Id, ctx: Context<'_, S>) {
        let now = Instant::now();
        let Some(meta) = ctx.metadata(id) else {
            return;
        };
        if let Ok(mut collector) = self.collector.lock() {
            collector.enter(id, meta, now);
        }
    }

    fn on_exit(&self, id: &span::Id, _ctx: Context<'_, S>) {
        let now = Instant::now();
        if let Ok(mut collector) = self.collector.lock() {
            collector.exit(id, now);
        }
    }
}
