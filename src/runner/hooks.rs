//! Crawler hooks
//!
//! The site-specific half of a runner: how to reach a page and what to pull
//! out of it. Hook calls are run through [`guarded`] so a panic in one task
//! becomes that task's failure.

use crate::browser::{extract, Page};
use crate::runner::{Task, TaskStack};
use crate::HarvestError;
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::{json, Value};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// What a detail page yields: the payload to store and its pass-through options
#[derive(Debug, Clone, PartialEq)]
pub struct Harvest {
    pub payload: Value,
    pub options: Value,
}

/// Site-specific behaviour plugged into a [`ListRunner`](crate::runner::ListRunner)
///
/// Only category extraction is mandatory. The navigation hooks default to a
/// plain settled-load navigation, and detail extraction defaults to the raw
/// document markup.
#[async_trait]
pub trait ListCrawler: Send + Sync + 'static {
    async fn goto_category(&self, page: &mut dyn Page, task: &Task) -> Result<(), HarvestError> {
        page.navigate(&task.uri).await
    }

    /// Pushes detail tasks found on a category page onto `details`
    ///
    /// Returns `true` when new detail work was added.
    async fn category_extract(
        &self,
        page: &mut dyn Page,
        task: &Task,
        details: &TaskStack,
    ) -> Result<bool, HarvestError>;

    async fn goto_detail(&self, page: &mut dyn Page, task: &Task) -> Result<(), HarvestError> {
        page.navigate(&task.uri).await
    }

    async fn detail_extract(&self, page: &mut dyn Page, task: &Task) -> Result<Harvest, HarvestError> {
        let payload = extract(page, |html| Ok(json!({ "data": html }))).await?;
        Ok(Harvest {
            payload,
            options: Value::Object(task.options.clone()),
        })
    }
}

/// Runs one task's hook calls, turning a panic into [`HarvestError::Panicked`]
pub(crate) async fn guarded<T, F>(uri: &str, hooks: F) -> Result<T, HarvestError>
where
    F: Future<Output = Result<T, HarvestError>>,
{
    match AssertUnwindSafe(hooks).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(HarvestError::Panicked {
            uri: uri.to_string(),
            message: panic_message(&*panic),
        }),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guarded_passes_results_through() {
        let ok = guarded("http://a", async { Ok::<_, HarvestError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = guarded("http://a", async {
            Err::<(), _>(HarvestError::navigation("http://a", "timeout"))
        })
        .await;
        assert!(matches!(err, Err(HarvestError::Navigation { .. })));
    }

    #[tokio::test]
    async fn test_guarded_converts_panic() {
        let uri = "http://a/boom".to_string();
        let result = guarded("http://a/boom", async {
            if uri.ends_with("boom") {
                panic!("extractor crashed on {}", uri);
            }
            Ok(())
        })
        .await;

        match result {
            Err(HarvestError::Panicked { uri, message }) => {
                assert_eq!(uri, "http://a/boom");
                assert_eq!(message, "extractor crashed on http://a/boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
