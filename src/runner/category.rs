//! Category walker
//!
//! Pops category tasks one at a time on a single recycled page, lets the
//! crawler push detail tasks, and asks the worker pool to grow whenever a
//! category reports new detail work.

use crate::browser::{Page, PagePool};
use crate::runner::coordinator::Shared;
use crate::runner::detail::request_growth;
use crate::runner::hooks::guarded;
use crate::runner::lease::PageLease;
use crate::runner::stats::CycleCounters;
use crate::runner::{ListCrawler, Task};
use crate::HarvestError;
use std::sync::Arc;

/// Drains the category stack; returns once it is empty
pub(crate) async fn run_category_phase<C: ListCrawler>(
    shared: &Arc<Shared<C>>,
    pool: &Arc<dyn PagePool>,
    pages_limit: usize,
) {
    let id = shared.id.as_str();
    tracing::info!(
        id,
        categories = shared.categories.len(),
        "category process is starting"
    );

    let mut lease = PageLease::new(pool.as_ref(), id, pages_limit);
    while let Some(task) = shared.categories.pop() {
        let page = match lease.page().await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(id, uri = %task.uri, error = %e, "no page available for category");
                CycleCounters::bump(&shared.counters.categories_failed);
                continue;
            }
        };

        tracing::info!(id, uri = %task.uri, "start process category");
        match guarded(&task.uri, walk_category(shared, page, &task)).await {
            Ok(added) => {
                CycleCounters::bump(&shared.counters.categories_processed);
                if added {
                    request_growth(shared, pool, pages_limit);
                }
            }
            Err(e) => {
                tracing::error!(id, uri = %task.uri, error = %e, "process category failed");
                CycleCounters::bump(&shared.counters.categories_failed);
            }
        }
        lease.visited().await;
    }
    lease.close().await;

    tracing::info!(id, "category process is done");
}

async fn walk_category<C: ListCrawler>(
    shared: &Shared<C>,
    page: &mut dyn Page,
    task: &Task,
) -> Result<bool, HarvestError> {
    shared.crawler.goto_category(page, task).await?;
    shared
        .crawler
        .category_extract(page, task, &shared.details)
        .await
}
