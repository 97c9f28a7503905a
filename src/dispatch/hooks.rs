/// Ordered exit hooks drained once at the end of an invocation.
use std::panic::{self, AssertUnwindSafe};

type Hook = Box<dyn FnOnce() -> anyhow::Result<()>>;

/// Deferred cleanup actions run in registration order, each exactly once.
///
/// [`ExitHooks::run_all`] is called at the end of dispatch. If the queue is
/// dropped while still holding hooks (for example during unwinding), the
/// remaining hooks run from `Drop`.
#[derive(Default)]
pub struct ExitHooks {
    hooks: Vec<(&'static str, Hook)>,
}

impl ExitHooks {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook.
    pub fn register<F>(&mut self, label: &'static str, hook: F)
    where
        F: FnOnce() -> anyhow::Result<()> + 'static,
    {
        self.hooks.push((label, Box::new(hook)));
    }

    /// Number of hooks still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run and remove every pending hook.
    ///
    /// Errors and panics from a hook are logged and do not stop later hooks.
    pub fn run_all(&mut self) {
        for (label, hook) in self.hooks.drain(..) {
            match panic::catch_unwind(AssertUnwindSafe(hook)) {
                Ok(Ok(())) => tracing::trace!(hook = label, "exit hook finished"),
                Ok(Err(err)) => tracing::warn!(hook = label, error = %err, "exit hook failed"),
                Err(_) => tracing::warn!(hook = label, "exit hook panicked"),
            }
        }
    }
}

impl Drop for ExitHooks {
    fn drop(&mut self) {
        self.run_all();
    }
}
