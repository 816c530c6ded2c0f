//! Rayon thread pool dispatch for production deployment.
//!
//! [`PooledDispatch`] owns a dedicated rayon pool for signature
//! verification, isolated from the scheduler's worker threads so a flood of
//! signature-heavy transactions cannot stall transaction intake.

use crate::Dispatch;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors from thread pool configuration.
#[derive(Debug, Error)]
pub enum ThreadPoolError {
    /// Rayon refused to build the pool.
    #[error("failed to build rayon thread pool: {0}")]
    RayonBuild(String),

    /// The configuration is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn default_verification_threads() -> usize {
    ThreadPoolConfig::auto().verification_threads
}

fn default_stack_size() -> usize {
    2 * 1024 * 1024
}

/// Configuration for the verification thread pool.
///
/// Use [`ThreadPoolConfig::auto`] to size the pool from the available
/// cores, or the builder for explicit control.
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadPoolConfig {
    /// Number of verification threads. Signature checks dominate the CPU
    /// cost of pre-handle, so this defaults to most of the machine.
    #[serde(default = "default_verification_threads")]
    pub verification_threads: usize,

    /// Stack size for pool threads, in bytes.
    #[serde(default = "default_stack_size")]
    pub stack_size: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self::auto()
    }
}

impl ThreadPoolConfig {
    /// Size the pool from the available CPU cores, reserving one core for
    /// the scheduler's own worker threads.
    pub fn auto() -> Self {
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(4);
        Self::for_core_count(available)
    }

    /// Configure for a specific core count.
    pub fn for_core_count(total_cores: usize) -> Self {
        Self {
            verification_threads: total_cores.saturating_sub(1).max(1),
            stack_size: default_stack_size(),
        }
    }

    /// Minimal configuration for tests: a single thread.
    pub fn minimal() -> Self {
        Self {
            verification_threads: 1,
            stack_size: default_stack_size(),
        }
    }

    /// Create a builder seeded with auto-detected defaults.
    pub fn builder() -> ThreadPoolConfigBuilder {
        ThreadPoolConfigBuilder::new()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ThreadPoolError> {
        if self.verification_threads == 0 {
            return Err(ThreadPoolError::InvalidConfig(
                "verification_threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ThreadPoolConfig`].
#[derive(Debug, Clone)]
pub struct ThreadPoolConfigBuilder {
    config: ThreadPoolConfig,
}

impl ThreadPoolConfigBuilder {
    /// Create a builder with auto-detected defaults.
    pub fn new() -> Self {
        Self {
            config: ThreadPoolConfig::auto(),
        }
    }

    /// Set the number of verification threads.
    pub fn verification_threads(mut self, count: usize) -> Self {
        self.config.verification_threads = count;
        self
    }

    /// Set the pool thread stack size.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = bytes;
        self
    }

    /// Build the configuration, validating it first.
    pub fn build(self) -> Result<ThreadPoolConfig, ThreadPoolError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ThreadPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct Pool {
    verification: rayon::ThreadPool,
    pending: AtomicUsize,
}

/// Rayon thread pool dispatch for production deployment.
///
/// Cheap to clone; clones share the underlying pool.
#[derive(Clone)]
pub struct PooledDispatch {
    config: ThreadPoolConfig,
    pool: Arc<Pool>,
}

impl PooledDispatch {
    /// Queue depth above which `try_spawn_verification` sheds work.
    const BACKPRESSURE_THRESHOLD: usize = 1024;

    /// Create a new pooled dispatch with the given configuration.
    pub fn new(config: ThreadPoolConfig) -> Result<Self, ThreadPoolError> {
        config.validate()?;

        let verification = rayon::ThreadPoolBuilder::new()
            .num_threads(config.verification_threads)
            .stack_size(config.stack_size)
            .thread_name(|i| format!("sig-verify-{}", i))
            .build()
            .map_err(|e| ThreadPoolError::RayonBuild(e.to_string()))?;

        tracing::info!(
            verification_threads = config.verification_threads,
            "Verification pool initialized"
        );

        Ok(Self {
            config,
            pool: Arc::new(Pool {
                verification,
                pending: AtomicUsize::new(0),
            }),
        })
    }

    /// Create with auto-detected configuration.
    pub fn auto() -> Result<Self, ThreadPoolError> {
        Self::new(ThreadPoolConfig::auto())
    }

    /// Get the configuration.
    pub fn config(&self) -> &ThreadPoolConfig {
        &self.config
    }
}

impl Dispatch for PooledDispatch {
    fn spawn_verification(&self, f: impl FnOnce() + Send + 'static) {
        self.pool.pending.fetch_add(1, Ordering::Relaxed);
        let pool = Arc::clone(&self.pool);
        self.pool.verification.spawn(move || {
            f();
            pool.pending.fetch_sub(1, Ordering::Relaxed);
        });
    }

    fn try_spawn_verification(&self, f: impl FnOnce() + Send + 'static) -> bool {
        if self.pool.pending.load(Ordering::Relaxed) > Self::BACKPRESSURE_THRESHOLD {
            return false;
        }
        self.spawn_verification(f);
        true
    }

    fn verification_queue_depth(&self) -> usize {
        self.pool.pending.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_config_is_valid() {
        let config = ThreadPoolConfig::auto();
        assert!(config.verification_threads >= 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_for_core_count_reserves_one() {
        assert_eq!(ThreadPoolConfig::for_core_count(1).verification_threads, 1);
        assert_eq!(ThreadPoolConfig::for_core_count(2).verification_threads, 1);
        assert_eq!(ThreadPoolConfig::for_core_count(9).verification_threads, 8);
    }

    #[test]
    fn test_builder_rejects_zero_threads() {
        assert!(ThreadPoolConfig::builder()
            .verification_threads(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_spawn_runs_task() {
        use std::sync::atomic::AtomicUsize;
        use std::sync::mpsc;

        let dispatch = PooledDispatch::new(ThreadPoolConfig::minimal()).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = mpsc::channel();

        let c = counter.clone();
        dispatch.spawn_verification(move || {
            c.fetch_add(1, Ordering::SeqCst);
            done_tx.send(()).unwrap();
        });

        done_rx.recv().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_try_spawn_accepts_when_idle() {
        use std::sync::mpsc;

        let dispatch = PooledDispatch::new(ThreadPoolConfig::minimal()).unwrap();
        let (done_tx, done_rx) = mpsc::channel();
        assert!(dispatch.try_spawn_verification(move || done_tx.send(()).unwrap()));
        done_rx.recv().unwrap();
    }

    #[test]
    fn test_queue_depth_drains() {
        use std::sync::mpsc;

        let dispatch = PooledDispatch::new(ThreadPoolConfig::minimal()).unwrap();
        let (done_tx, done_rx) = mpsc::channel();
        dispatch.spawn_verification(move || done_tx.send(()).unwrap());
        done_rx.recv().unwrap();

        // The counter decrements after the closure runs; give it a moment.
        for _ in 0..100 {
            if dispatch.verification_queue_depth() == 0 {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        panic!("queue depth never drained");
    }
}
