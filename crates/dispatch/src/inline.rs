//! Inline dispatch for deterministic tests and simulation.

use crate::Dispatch;

/// Runs every task immediately on the calling thread.
///
/// No queues, no parallelism: work completes before the spawn call
/// returns, which makes test interleavings deterministic. Futures backed by
/// inline-dispatched verifications are therefore already complete when the
/// workflow hands them out.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineDispatch;

impl InlineDispatch {
    /// Create a new inline dispatch.
    pub fn new() -> Self {
        Self
    }
}

impl Dispatch for InlineDispatch {
    fn spawn_verification(&self, f: impl FnOnce() + Send + 'static) {
        f();
    }

    fn try_spawn_verification(&self, f: impl FnOnce() + Send + 'static) -> bool {
        f();
        true
    }

    fn verification_queue_depth(&self) -> usize {
        0
    }
}
