//! Detail worker pool
//!
//! Workers drain the shared detail stack concurrently. The pool grows by one
//! worker per "new detail work" signal from the category walker, never past
//! the page-per-handle cap, and shrinks as workers find the stack empty.

use crate::browser::{Page, PagePool};
use crate::runner::coordinator::Shared;
use crate::runner::hooks::guarded;
use crate::runner::lease::PageLease;
use crate::runner::stats::CycleCounters;
use crate::runner::{ListCrawler, Task};
use crate::HarvestError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct PoolState {
    running: usize,
    next_seq: u64,
    in_flight: HashMap<u64, JoinHandle<()>>,
}

/// Running count and in-flight handles of the detail workers
#[derive(Debug, Default)]
pub(crate) struct WorkerPool {
    state: Mutex<PoolState>,
}

impl WorkerPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of workers that have been admitted and not yet finished
    pub(crate) fn running(&self) -> usize {
        self.state().running
    }

    /// Takes every currently registered worker handle out of the map
    ///
    /// Workers admitted after this call are not part of the returned set.
    pub(crate) fn take_in_flight(&self) -> Vec<(u64, JoinHandle<()>)> {
        let mut handles: Vec<_> = self.state().in_flight.drain().collect();
        handles.sort_by_key(|(seq, _)| *seq);
        handles
    }

    fn finish(&self, seq: u64) {
        let mut state = self.state();
        state.running = state.running.saturating_sub(1);
        state.in_flight.remove(&seq);
    }
}

/// Marks a worker finished when dropped, including on unwind
struct WorkerSlot<'a> {
    pool: &'a WorkerPool,
    seq: u64,
}

impl Drop for WorkerSlot<'_> {
    fn drop(&mut self) {
        self.pool.finish(self.seq);
    }
}

/// Admits one more detail worker unless `cap` workers are already running
///
/// Returns whether a worker was started.
pub(crate) fn request_growth<C: ListCrawler>(
    shared: &Arc<Shared<C>>,
    pool: &Arc<dyn PagePool>,
    cap: usize,
) -> bool {
    // The lock is held across spawn and registration so a fast worker
    // cannot deregister before it is registered.
    let mut state = shared.workers.state();
    if state.running >= cap {
        return false;
    }

    state.running += 1;
    let seq = state.next_seq;
    state.next_seq += 1;

    let handle = tokio::spawn(run_detail_worker(
        Arc::clone(shared),
        Arc::clone(pool),
        cap,
        seq,
    ));
    state.in_flight.insert(seq, handle);
    CycleCounters::bump(&shared.counters.workers_spawned);

    tracing::debug!(id = %shared.id, worker = seq, running = state.running, "detail worker admitted");
    true
}

/// Drains the shared detail stack until it is empty
async fn run_detail_worker<C: ListCrawler>(
    shared: Arc<Shared<C>>,
    pool: Arc<dyn PagePool>,
    pages_limit: usize,
    seq: u64,
) {
    let _slot = WorkerSlot {
        pool: &shared.workers,
        seq,
    };
    let id = shared.id.as_str();
    tracing::info!(id, worker = seq, "detail worker starting");

    let mut lease = PageLease::new(pool.as_ref(), id, pages_limit);
    while let Some(task) = shared.details.pop() {
        let page = match lease.page().await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(id, uri = %task.uri, error = %e, "no page available for detail");
                CycleCounters::bump(&shared.counters.details_failed);
                continue;
            }
        };

        tracing::info!(id, uri = %task.uri, "start process detail");
        match guarded(&task.uri, harvest_detail(&shared, page, &task)).await {
            Ok(()) => CycleCounters::bump(&shared.counters.details_saved),
            Err(e) => {
                tracing::warn!(id, uri = %task.uri, error = %e, "process detail failed");
                CycleCounters::bump(&shared.counters.details_failed);
            }
        }
        lease.visited().await;
    }
    lease.close().await;

    tracing::info!(id, worker = seq, "detail worker done");
}

async fn harvest_detail<C: ListCrawler>(
    shared: &Shared<C>,
    page: &mut dyn Page,
    task: &Task,
) -> Result<(), HarvestError> {
    shared.crawler.goto_detail(page, task).await?;
    let harvest = shared.crawler.detail_extract(page, task).await?;
    shared
        .storage
        .save(&task.uri, &harvest.payload, &harvest.options)
        .await?;
    Ok(())
}
