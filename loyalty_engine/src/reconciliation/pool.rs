use std::{
    any::Any,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use log::*;
use tokio::task::{JoinError, JoinHandle, JoinSet};

use crate::{
    accrual::AccrualService,
    events::EventProducers,
    reconciliation::{ReconciliationConfig, ReconciliationError, ReconciliationQueue, ReconciliationWorker},
    traits::OrderManagement,
};

/// A fixed-size pool of [`ReconciliationWorker`]s, kept at full strength by a supervisor task.
///
/// The supervisor owns every worker in a [`JoinSet`]. Whenever a worker ends, for whatever reason, a replacement is
/// spawned in its place, so the pool never shrinks.
pub struct ReconciliationPool<B, A> {
    db: Arc<B>,
    accrual: Arc<A>,
    queue: ReconciliationQueue,
    config: ReconciliationConfig,
    producers: EventProducers,
}

impl<B, A> ReconciliationPool<B, A>
where
    B: OrderManagement + 'static,
    A: AccrualService + 'static,
{
    pub fn new(
        db: B,
        accrual: A,
        queue: ReconciliationQueue,
        config: ReconciliationConfig,
        producers: EventProducers,
    ) -> Self {
        Self { db: Arc::new(db), accrual: Arc::new(accrual), queue, config, producers }
    }

    /// Spawns the supervisor, which in turn spawns the workers. Do not await the handle's supervisor task, as it runs
    /// indefinitely.
    pub fn start(self) -> PoolHandle {
        let restarts = Arc::new(AtomicU64::new(0));
        let queue = self.queue.clone();
        let size = self.config.worker_count.max(1);
        let supervisor = tokio::spawn(self.supervise(Arc::clone(&restarts)));
        PoolHandle { supervisor, restarts, queue, size }
    }

    async fn supervise(self, restarts: Arc<AtomicU64>) {
        let size = self.config.worker_count.max(1);
        let mut workers = JoinSet::new();
        let mut next_id = 0usize;
        for _ in 0..size {
            self.spawn_worker(&mut workers, next_id);
            next_id += 1;
        }
        info!("🔁️ Reconciliation pool started with {size} workers");
        while let Some(ended) = workers.join_next().await {
            match ended.map_err(ReconciliationError::from) {
                Ok(Ok(())) => warn!("🔁️ A reconciliation worker stopped unexpectedly"),
                Ok(Err(e)) | Err(e) => error!("🔁️ A reconciliation worker died. {e}"),
            }
            let count = restarts.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.config.restart_delay.is_zero() {
                tokio::time::sleep(self.config.restart_delay).await;
            }
            self.spawn_worker(&mut workers, next_id);
            info!("🔁️ Worker {next_id} spawned as a replacement. {count} restarts so far");
            next_id += 1;
        }
    }

    fn spawn_worker(&self, workers: &mut JoinSet<Result<(), ReconciliationError>>, id: usize) {
        let worker = ReconciliationWorker::new(
            id,
            Arc::clone(&self.db),
            Arc::clone(&self.accrual),
            self.queue.clone(),
            self.config.clone(),
            self.producers.clone(),
        );
        workers.spawn(worker.run());
    }
}

impl From<JoinError> for ReconciliationError {
    fn from(e: JoinError) -> Self {
        if e.is_panic() {
            ReconciliationError::WorkerPanicked(panic_message(e.into_panic()))
        } else {
            ReconciliationError::WorkerCancelled
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// A handle onto a running [`ReconciliationPool`].
pub struct PoolHandle {
    supervisor: JoinHandle<()>,
    restarts: Arc<AtomicU64>,
    queue: ReconciliationQueue,
    size: usize,
}

impl PoolHandle {
    /// The number of workers that have been replaced since the pool started.
    pub fn restarts(&self) -> u64 {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_running(&self) -> bool {
        !self.supervisor.is_finished()
    }

    /// Stops the supervisor. Dropping its `JoinSet` aborts every worker. Orders that were in flight go back on the
    /// queue.
    pub async fn shutdown(self) {
        self.supervisor.abort();
        let _ = self.supervisor.await;
        info!("🔁️ Reconciliation pool has shut down. {} orders still queued", self.queue.len());
    }
}
