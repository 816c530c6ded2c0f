//! Dispatch trait for scheduling CPU-bound signature verification.
//!
//! The pre-handle workflow runs on worker threads owned by an external
//! scheduler and must never block them on cryptography. Every signature
//! check it fans out goes through the [`Dispatch`] seam defined here:
//!
//! - [`PooledDispatch`] schedules onto a dedicated rayon pool (production)
//! - [`InlineDispatch`] runs closures immediately on the calling thread
//!   (deterministic tests and simulation)
//!
//! Results travel back through channels captured in the closures; nothing
//! here blocks the caller.

mod inline;
mod pooled;

pub use inline::InlineDispatch;
pub use pooled::{PooledDispatch, ThreadPoolConfig, ThreadPoolConfigBuilder, ThreadPoolError};

/// Trait for dispatching CPU-bound verification work to an isolated pool.
pub trait Dispatch: Send + Sync + Clone + 'static {
    /// Spawn a signature-verification task.
    fn spawn_verification(&self, f: impl FnOnce() + Send + 'static);

    /// Spawn a verification task with backpressure.
    ///
    /// Returns `true` if spawned, `false` if the pool is overloaded. For
    /// speculative work the scheduler can retry or shed; required
    /// verifications use [`Dispatch::spawn_verification`], which always
    /// queues.
    fn try_spawn_verification(&self, f: impl FnOnce() + Send + 'static) -> bool;

    /// Current verification pool queue depth.
    ///
    /// A backpressure and metrics signal for the owning scheduler.
    fn verification_queue_depth(&self) -> usize;
}
