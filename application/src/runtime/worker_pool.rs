//! Fixed pool of blocking workers sharing one cancellation token

use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What became of the workers once the pool was shut down
#[derive(Debug)]
pub struct PoolReport<R> {
    pub finished: Vec<R>,
    /// Workers that panicked
    pub failed: usize,
    /// Workers still running when the join timeout expired
    pub abandoned: usize,
}

impl<R> PoolReport<R> {
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.abandoned == 0
    }
}

/// Runs blocking closures on tokio's blocking threads.
///
/// Every worker gets a clone of the pool token and is expected to return
/// soon after it is cancelled. Blocking tasks cannot be aborted, so a
/// worker that ignores the token is abandoned at shutdown.
pub struct WorkerPool<R> {
    name: String,
    token: CancellationToken,
    workers: JoinSet<R>,
    finished: Vec<R>,
    failed: usize,
}

impl<R: Send + 'static> WorkerPool<R> {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_token(name, CancellationToken::new())
    }

    pub fn with_token(name: impl Into<String>, token: CancellationToken) -> Self {
        Self {
            name: name.into(),
            token,
            workers: JoinSet::new(),
            finished: Vec::new(),
            failed: 0,
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Workers not yet joined
    pub fn running(&self) -> usize {
        self.workers.len()
    }

    pub fn spawn<F>(&mut self, work: F)
    where
        F: FnOnce(CancellationToken) -> R + Send + 'static,
    {
        let token = self.token.clone();
        self.workers.spawn_blocking(move || work(token));
        debug!(pool = %self.name, workers = self.workers.len(), "Spawned worker");
    }

    /// Wait until every worker has returned on its own.
    ///
    /// Cancel safe: workers joined before cancellation are kept.
    pub async fn join_all(&mut self) {
        while let Some(result) = self.workers.join_next().await {
            self.record(result);
        }
    }

    /// Cancel the token, then join for at most `timeout`
    pub async fn shutdown(mut self, timeout: Duration) -> PoolReport<R> {
        self.token.cancel();
        let deadline = tokio::time::Instant::now() + timeout;

        let mut abandoned = 0;
        loop {
            match tokio::time::timeout_at(deadline, self.workers.join_next()).await {
                Ok(Some(result)) => self.record(result),
                Ok(None) => break,
                Err(_) => {
                    abandoned = self.workers.len();
                    warn!(pool = %self.name, abandoned, "Workers did not stop in time");
                    self.workers.detach_all();
                    break;
                }
            }
        }

        PoolReport {
            finished: std::mem::take(&mut self.finished),
            failed: self.failed,
            abandoned,
        }
    }

    fn record(&mut self, result: Result<R, JoinError>) {
        match result {
            Ok(output) => self.finished.push(output),
            Err(e) => {
                warn!(pool = %self.name, error = %e, "Worker failed");
                self.failed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_workers_stop_on_cancel() {
        let mut pool = WorkerPool::new("test");
        for id in 0..3u32 {
            pool.spawn(move |token| {
                let mut spins = 0u64;
                while !token.is_cancelled() {
                    spins += 1;
                    std::thread::sleep(Duration::from_millis(1));
                }
                (id, spins)
            });
        }
        assert_eq!(pool.running(), 3);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let report = pool.shutdown(Duration::from_secs(5)).await;

        assert!(report.is_clean());
        assert_eq!(report.finished.len(), 3);
    }

    #[tokio::test]
    async fn test_panicking_worker_is_counted() {
        let mut pool: WorkerPool<()> = WorkerPool::new("test");
        pool.spawn(|_| panic!("disk full"));
        pool.spawn(|_| ());
        pool.join_all().await;

        let report = pool.shutdown(Duration::from_secs(1)).await;
        assert_eq!(report.failed, 1);
        assert_eq!(report.finished.len(), 1);
    }

    #[tokio::test]
    async fn test_stubborn_worker_is_abandoned() {
        let release = Arc::new(AtomicBool::new(false));
        let mut pool = WorkerPool::new("test");
        let flag = Arc::clone(&release);
        pool.spawn(move |_| {
            while !flag.load(Ordering::SeqCst) {
                std::thread::sleep(Duration::from_millis(1));
            }
        });

        let report = pool.shutdown(Duration::from_millis(20)).await;
        assert_eq!(report.abandoned, 1);
        release.store(true, Ordering::SeqCst);
    }
}
