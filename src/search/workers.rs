use crate::search::SearchError;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::available_parallelism;

/// Environment variable read when no thread count is given on the command line.
pub const THREADS_ENV: &str = "HEXSEARCH_THREADS";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThreadMode {
    Sequential,
    Pool(usize),
    #[default]
    Auto,
}

impl ThreadMode {
    pub fn from_flag_or_env(flag: Option<usize>) -> Self {
        let threads = flag.or_else(|| {
            env::var(THREADS_ENV)
                .ok()
                .and_then(|value| value.trim().parse().ok())
        });
        match threads {
            Some(threads) => ThreadMode::Pool(threads),
            None => ThreadMode::Auto,
        }
    }

    /// Collapses `Auto` and single-thread pools into a concrete mode.
    pub fn resolve(self) -> ThreadMode {
        match self {
            ThreadMode::Sequential => ThreadMode::Sequential,
            ThreadMode::Pool(n) => {
                if n <= 1 {
                    ThreadMode::Sequential
                } else {
                    ThreadMode::Pool(n)
                }
            }
            ThreadMode::Auto => {
                let threads = available_parallelism()
                    .map(|count| count.get())
                    .unwrap_or(1);
                ThreadMode::Pool(threads).resolve()
            }
        }
    }

    pub fn threads(self) -> usize {
        match self.resolve() {
            ThreadMode::Pool(n) => n,
            _ => 1,
        }
    }
}

/// Hands out work item indices from a shared counter. The rayon pool is built
/// once and reused for every batch.
pub struct WorkerPool {
    threads: usize,
    pool: Option<rayon::ThreadPool>,
}

impl WorkerPool {
    pub fn new(mode: ThreadMode) -> Result<Self, SearchError> {
        match mode.resolve() {
            ThreadMode::Pool(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("hexsearch-worker-{index}"))
                    .build()?;
                Ok(Self {
                    threads,
                    pool: Some(pool),
                })
            }
            _ => Ok(Self {
                threads: 1,
                pool: None,
            }),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Calls `work` once for every index in `0..items` and returns when all
    /// calls have finished.
    pub fn run<F>(&self, items: usize, work: F)
    where
        F: Fn(usize) + Sync,
    {
        let Some(pool) = &self.pool else {
            (0..items).for_each(work);
            return;
        };

        let next = AtomicUsize::new(0);
        let worker = || loop {
            let item = next.fetch_add(1, Ordering::Relaxed);
            if item >= items {
                break;
            }
            work(item);
        };
        pool.scope(|scope| {
            for _ in 0..self.threads.min(items) {
                scope.spawn(|_| worker());
            }
        });
    }
}
