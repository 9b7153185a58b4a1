use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use depot_core::AppError;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WorkerError {
    #[error("Worker pool is shut down")]
    ShutDown,

    #[error("Job panicked: {0}")]
    Panicked(String),

    #[error("Job was cancelled")]
    Cancelled,
}

impl From<WorkerError> for AppError {
    fn from(err: WorkerError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Bounded job pool
///
/// At most `max_workers` jobs run at once; the rest wait for a permit.
/// Jobs are spawned on submission, so dropping the returned handle does not
/// stop them.
#[derive(Clone, Debug)]
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    max_workers: usize,
}

impl WorkerPool {
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        tracing::info!(max_workers, "Upload worker pool started");
        Self {
            semaphore: Arc::new(Semaphore::new(max_workers)),
            max_workers,
        }
    }

    /// Run `job` on the pool once a worker is free.
    pub fn submit<F, T>(&self, job: F) -> JobHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = self.semaphore.clone();
        let inner = tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| WorkerError::ShutDown)?;
            Ok(job.await)
        });

        JobHandle { inner }
    }

    /// Stop accepting work. Jobs already holding a worker finish; queued and
    /// later jobs resolve to [`WorkerError::ShutDown`].
    pub fn close(&self) {
        self.semaphore.close();
        tracing::info!("Upload worker pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn available_workers(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Pending result of a job submitted to a [`WorkerPool`].
#[derive(Debug)]
pub struct JobHandle<T> {
    inner: JoinHandle<Result<T, WorkerError>>,
}

impl<T> Future for JobHandle<T> {
    type Output = Result<T, WorkerError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().inner).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_panic() => {
                tracing::error!(error = %e, "Worker job panicked");
                Poll::Ready(Err(WorkerError::Panicked(e.to_string())))
            }
            Poll::Ready(Err(_)) => Poll::Ready(Err(WorkerError::Cancelled)),
        }
    }
}
