//! Cycle coordinator
//!
//! One cycle seeds the category stack from configuration, walks every
//! category (growing the detail pool as work appears), then waits once for the
//! detail workers registered at that moment. Between cycles the runner sleeps
//! for the configured delay; a delay below one millisecond means a single cycle.

use crate::browser::{MaxPagePool, PagePool};
use crate::config::{CategoryEntry, Config, DEFAULT_DELAY_MS, DEFAULT_PAGES_PER_HANDLE};
use crate::runner::category::run_category_phase;
use crate::runner::detail::WorkerPool;
use crate::runner::stats::{CycleCounters, CycleStats};
use crate::runner::{ListCrawler, Task, TaskStack};
use crate::storage::DataStorage;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Scheduling knobs for a [`ListRunner`]
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub id: String,

    /// Milliseconds between cycles; below 1 runs once
    pub delay_ms: i64,

    /// Visits per page handle before recycling; also the detail worker cap
    pub pages_per_handle: usize,

    /// Cap on concurrently outstanding page handles
    pub max_contexts: Option<usize>,

    pub categories: Vec<CategoryEntry>,
}

impl RunnerSettings {
    pub fn new(id: impl Into<String>, categories: Vec<CategoryEntry>) -> Self {
        Self {
            id: id.into(),
            delay_ms: DEFAULT_DELAY_MS,
            pages_per_handle: DEFAULT_PAGES_PER_HANDLE,
            max_contexts: None,
            categories,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            id: config.id.clone(),
            delay_ms: config.delay_ms(),
            pages_per_handle: config.pages_per_handle(),
            max_contexts: config.max_contexts(),
            categories: config.categories.clone(),
        }
    }

    fn pages_limit(&self) -> usize {
        if self.pages_per_handle == 0 {
            DEFAULT_PAGES_PER_HANDLE
        } else {
            self.pages_per_handle
        }
    }
}

/// State shared by the walker, the detail workers and the coordinator
pub(crate) struct Shared<C> {
    pub id: String,
    pub settings: RunnerSettings,
    pub crawler: C,
    pub storage: Arc<dyn DataStorage>,
    pub categories: TaskStack,
    pub details: TaskStack,
    pub workers: WorkerPool,
    pub counters: CycleCounters,
}

/// Recurring two-tier crawl over a set of categories
pub struct ListRunner<C> {
    shared: Arc<Shared<C>>,
}

impl<C: ListCrawler> ListRunner<C> {
    pub fn new(settings: RunnerSettings, crawler: C, storage: Arc<dyn DataStorage>) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: settings.id.clone(),
                settings,
                crawler,
                storage,
                categories: TaskStack::new(),
                details: TaskStack::new(),
                workers: WorkerPool::new(),
                counters: CycleCounters::default(),
            }),
        }
    }

    pub fn from_config(config: &Config, crawler: C, storage: Arc<dyn DataStorage>) -> Self {
        Self::new(RunnerSettings::from_config(config), crawler, storage)
    }

    pub fn id(&self) -> &str {
        &self.shared.id
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.shared.settings
    }

    pub fn crawler(&self) -> &C {
        &self.shared.crawler
    }

    /// Detail tasks not yet taken by a worker
    pub fn pending_details(&self) -> usize {
        self.shared.details.len()
    }

    /// Detail workers admitted and not yet finished
    pub fn running_workers(&self) -> usize {
        self.shared.workers.running()
    }

    /// Runs cycles until a delay below 1 stops the loop
    ///
    /// Returns the number of cycles completed.
    pub async fn process(&self, pool: Arc<dyn PagePool>) -> u64 {
        self.process_until(pool, std::future::pending()).await
    }

    /// Like [`process`](Self::process), but also stops when `shutdown`
    /// resolves during the inter-cycle sleep. A cycle in progress is never
    /// interrupted.
    pub async fn process_until<F>(&self, pool: Arc<dyn PagePool>, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let settings = &self.shared.settings;
        tracing::info!(
            id = %self.shared.id,
            delay_ms = settings.delay_ms,
            pages_per_handle = settings.pages_limit(),
            max_contexts = ?settings.max_contexts,
            categories = settings.categories.len(),
            "runner is starting"
        );

        let pool: Arc<dyn PagePool> = match settings.max_contexts {
            Some(max) => Arc::new(MaxPagePool::new(pool, max)),
            None => pool,
        };

        tokio::pin!(shutdown);
        let mut cycles = 0;
        loop {
            self.run_once(&pool).await;
            cycles += 1;

            let delay = settings.delay_ms;
            if delay < 1 {
                tracing::info!(id = %self.shared.id, cycles, "runner is done");
                break;
            }

            tracing::info!(id = %self.shared.id, delay_ms = delay, "will restart process after delay");
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(delay as u64)) => {}
                _ = &mut shutdown => {
                    tracing::info!(id = %self.shared.id, cycles, "runner stopped by shutdown");
                    break;
                }
            }
        }
        cycles
    }

    /// Runs a single cycle: seed, walk categories, then wait for the detail
    /// workers registered when the walk finished
    pub async fn run_once(&self, pool: &Arc<dyn PagePool>) -> CycleStats {
        let shared = &self.shared;
        let started = Instant::now();
        shared.counters.reset();

        shared
            .categories
            .extend(shared.settings.categories.iter().map(Task::from));

        run_category_phase(shared, pool, shared.settings.pages_limit()).await;

        let workers = shared.workers.take_in_flight();
        tracing::info!(id = %shared.id, workers = workers.len(), "waiting for detail workers");
        for (seq, handle) in workers {
            if let Err(e) = handle.await {
                tracing::warn!(id = %shared.id, worker = seq, error = %e, "detail worker ended abnormally");
            }
        }

        let stats = shared.counters.snapshot(started.elapsed());
        tracing::info!(id = %shared.id, %stats, "once process is done");
        stats
    }
}
