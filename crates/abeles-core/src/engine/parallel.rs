use super::config::{ConfigError, EngineConfig, Workers};
use super::error::EngineError;
use crate::core::models::slab::SlabStack;
use crate::core::reflect::kernel::PreparedStack;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::Arc;
#[cfg(feature = "parallel")]
use tracing::trace;

/// Live default-worker overrides in creation order, keyed by guard id.
static OVERRIDES: Mutex<Vec<(u64, Workers)>> = Mutex::new(Vec::new());
static NEXT_GUARD_ID: AtomicU64 = AtomicU64::new(0);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Worker setting used by configurations that do not choose one.
///
/// The most recently created live override wins; with none alive this is [`Workers::All`].
pub fn default_workers() -> Workers {
    lock(&OVERRIDES)
        .last()
        .map_or(Workers::All, |&(_, workers)| workers)
}

/// Withdraws its override of the default worker setting when dropped.
///
/// Guards may be dropped in any order. Dropping one removes only its own override.
#[must_use = "the override is withdrawn as soon as the guard is dropped"]
#[derive(Debug)]
pub struct DefaultWorkersGuard {
    id: u64,
}

impl Drop for DefaultWorkersGuard {
    fn drop(&mut self) {
        lock(&OVERRIDES).retain(|&(id, _)| id != self.id);
    }
}

/// Overrides the process-wide default until the returned guard goes out of scope.
pub fn override_default_workers(workers: Workers) -> Result<DefaultWorkersGuard, ConfigError> {
    if workers == Workers::Count(0) {
        return Err(ConfigError::InvalidParameter {
            name: "workers",
            reason: "worker count must be at least 1".to_string(),
        });
    }
    let id = NEXT_GUARD_ID.fetch_add(1, Ordering::Relaxed);
    lock(&OVERRIDES).push((id, workers));
    Ok(DefaultWorkersGuard { id })
}

/// Dedicated pools by thread count, built on first use.
#[cfg(feature = "parallel")]
static POOLS: Mutex<Vec<(usize, Arc<rayon::ThreadPool>)>> = Mutex::new(Vec::new());

#[cfg(feature = "parallel")]
fn dedicated_pool(threads: usize) -> Result<Arc<rayon::ThreadPool>, EngineError> {
    let mut pools = lock(&POOLS);
    if let Some((_, pool)) = pools.iter().find(|(n, _)| *n == threads) {
        return Ok(Arc::clone(pool));
    }
    trace!(workers = threads, "Building a dedicated worker pool");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map(Arc::new)
        .map_err(|e| EngineError::ThreadPool(e.to_string()))?;
    pools.push((threads, Arc::clone(&pool)));
    Ok(pool)
}

/// Evaluates per-point functions over a Q array, serially or on a worker pool.
///
/// Every output element is computed independently by the same closure, so the
/// result does not depend on the number of workers.
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    workers: Workers,
    min_chunk_len: usize,
}

impl Executor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            workers: config.workers,
            min_chunk_len: config.min_chunk_len.max(1),
        }
    }

    /// `f(i)` for every `i` in `0..len`, in order.
    pub fn map<F>(&self, len: usize, f: F) -> Result<Vec<f64>, EngineError>
    where
        F: Fn(usize) -> f64 + Send + Sync,
    {
        if self.workers.is_serial() || len <= self.min_chunk_len {
            return Ok((0..len).map(f).collect());
        }
        self.map_parallel(len, f)
    }

    #[cfg(not(feature = "parallel"))]
    fn map_parallel<F>(&self, len: usize, f: F) -> Result<Vec<f64>, EngineError>
    where
        F: Fn(usize) -> f64 + Send + Sync,
    {
        Ok((0..len).map(f).collect())
    }

    #[cfg(feature = "parallel")]
    fn map_parallel<F>(&self, len: usize, f: F) -> Result<Vec<f64>, EngineError>
    where
        F: Fn(usize) -> f64 + Send + Sync,
    {
        let min_len = self.min_chunk_len;
        match self.workers {
            Workers::All => {
                trace!(len, "Evaluating on the global worker pool");
                Ok((0..len).into_par_iter().with_min_len(min_len).map(f).collect())
            }
            Workers::Count(n) => {
                trace!(len, workers = n, "Evaluating on a dedicated worker pool");
                let pool = dedicated_pool(n)?;
                Ok(pool.install(|| {
                    (0..len)
                        .into_par_iter()
                        .with_min_len(min_len)
                        .map(f)
                        .collect::<Vec<f64>>()
                }))
            }
        }
    }

    /// Unsmeared reflectivity of `stack` at every Q.
    pub fn reflectivity(&self, q: &[f64], stack: &SlabStack) -> Result<Vec<f64>, EngineError> {
        let prepared = PreparedStack::new(stack)?;
        self.map(q.len(), |i| prepared.reflectivity_at(q[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::layer_model::to_slabs;
    use crate::core::reflect::kernel::abeles;
    use serial_test::serial;

    fn multilayer() -> SlabStack {
        let mut coefficients = vec![10.0, 1.0, 0.0, 0.0, 2.07, 0.0, 1e-7, 3.0];
        for k in 0..10 {
            let sld = if k % 2 == 0 { 6.36 } else { -0.56 };
            coefficients.extend_from_slice(&[45.0 + k as f64, sld, 0.001, 4.0]);
        }
        to_slabs(&coefficients).unwrap()
    }

    fn serial_executor() -> Executor {
        Executor::new(&EngineConfig {
            workers: Workers::Count(1),
            ..EngineConfig::default()
        })
    }

    fn q_grid(n: usize) -> Vec<f64> {
        (0..n).map(|i| 0.005 + 0.3 * i as f64 / n as f64).collect()
    }

    #[test]
    fn parallel_reflectivity_is_identical_to_serial_kernel() {
        let stack = multilayer();
        let q = q_grid(1000);
        let expected = abeles(&q, &stack).unwrap();
        for workers in [Workers::Count(1), Workers::Count(2), Workers::Count(3), Workers::All] {
            let config = EngineConfig {
                workers,
                min_chunk_len: 16,
                ..EngineConfig::default()
            };
            let computed = Executor::new(&config).reflectivity(&q, &stack).unwrap();
            assert_eq!(computed, expected, "workers {workers:?}");
        }
    }

    #[test]
    fn map_preserves_order() {
        let executor = Executor::new(&EngineConfig {
            workers: Workers::Count(4),
            min_chunk_len: 1,
            ..EngineConfig::default()
        });
        let values = executor.map(257, |i| i as f64).unwrap();
        assert_eq!(values, (0..257).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let values = serial_executor().reflectivity(&[], &multilayer()).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn invalid_stack_is_rejected() {
        let stack = SlabStack {
            scale: 1.0,
            background: 0.0,
            slabs: Vec::new(),
        };
        let result = serial_executor().reflectivity(&[0.1], &stack);
        assert!(matches!(result, Err(EngineError::InvalidModel { .. })));
    }

    #[test]
    #[serial]
    fn override_guard_restores_previous_default() {
        assert_eq!(default_workers(), Workers::All);
        {
            let _outer = override_default_workers(Workers::Count(2)).unwrap();
            assert_eq!(default_workers(), Workers::Count(2));
            {
                let _inner = override_default_workers(Workers::Count(5)).unwrap();
                assert_eq!(default_workers(), Workers::Count(5));
            }
            assert_eq!(default_workers(), Workers::Count(2));
        }
        assert_eq!(default_workers(), Workers::All);
    }

    #[test]
    #[serial]
    fn overlapping_guards_dropped_out_of_order_leave_no_override() {
        let first = override_default_workers(Workers::Count(2)).unwrap();
        let second = override_default_workers(Workers::Count(5)).unwrap();
        drop(first);
        assert_eq!(default_workers(), Workers::Count(5));
        drop(second);
        assert_eq!(default_workers(), Workers::All);
    }

    #[test]
    #[serial]
    fn dropping_older_guard_keeps_newer_override() {
        let first = override_default_workers(Workers::Count(2)).unwrap();
        let second = override_default_workers(Workers::Count(5)).unwrap();
        let third = override_default_workers(Workers::Count(3)).unwrap();
        drop(third);
        assert_eq!(default_workers(), Workers::Count(5));
        drop(first);
        assert_eq!(default_workers(), Workers::Count(5));
        drop(second);
        assert_eq!(default_workers(), Workers::All);
    }

    #[test]
    #[serial]
    fn guards_from_other_threads_do_not_leak() {
        let guard = override_default_workers(Workers::Count(4)).unwrap();
        std::thread::spawn(|| {
            let _inner = override_default_workers(Workers::Count(6)).unwrap();
        })
        .join()
        .unwrap();
        assert_eq!(default_workers(), Workers::Count(4));
        drop(guard);
        assert_eq!(default_workers(), Workers::All);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn dedicated_pools_are_reused_per_thread_count() {
        let first = dedicated_pool(3).unwrap();
        let second = dedicated_pool(3).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.current_num_threads(), 3);
        assert!(!Arc::ptr_eq(&first, &dedicated_pool(2).unwrap()));
    }

    #[test]
    #[serial]
    fn override_guard_restores_default_on_early_return() {
        fn run() -> Result<(), EngineError> {
            let _guard = override_default_workers(Workers::Count(3))?;
            Err(EngineError::InvalidParameters("early exit".to_string()))
        }
        assert!(run().is_err());
        assert_eq!(default_workers(), Workers::All);
    }

    #[test]
    #[serial]
    fn override_guard_restores_default_on_panic() {
        let result = std::panic::catch_unwind(|| {
            let _guard = override_default_workers(Workers::Count(7)).unwrap();
            panic!("evaluation failed");
        });
        assert!(result.is_err());
        assert_eq!(default_workers(), Workers::All);
    }

    #[test]
    #[serial]
    fn zero_worker_override_is_rejected() {
        assert!(override_default_workers(Workers::Count(0)).is_err());
        assert_eq!(default_workers(), Workers::All);
    }

    #[test]
    #[serial]
    fn default_config_follows_process_default() {
        let _guard = override_default_workers(Workers::Count(2)).unwrap();
        assert_eq!(EngineConfig::default().workers, Workers::Count(2));
    }
}
