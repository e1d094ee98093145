use crate::browser::{Page, PagePool};
use crate::HarvestError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Caps the number of handles outstanding from an inner pool
///
/// `acquire` waits while `max` handles are out; each `release` frees a slot.
/// A `max` of 0 would never hand out a page and is raised to 1.
pub struct MaxPagePool<P> {
    inner: P,
    slots: Arc<Semaphore>,
    max: usize,
}

impl<P: PagePool> MaxPagePool<P> {
    pub fn new(inner: P, max: usize) -> Self {
        let max = max.max(1);
        Self {
            inner,
            slots: Arc::new(Semaphore::new(max)),
            max,
        }
    }

    /// Number of handles that may still be acquired without waiting
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

#[async_trait]
impl<P: PagePool> PagePool for MaxPagePool<P> {
    async fn acquire(&self, owner: &str) -> Result<Box<dyn Page>, HarvestError> {
        let permit = self
            .slots
            .acquire()
            .await
            .map_err(|e| HarvestError::PagePool(e.to_string()))?;
        // The slot is returned explicitly in `release`.
        permit.forget();

        match self.inner.acquire(owner).await {
            Ok(page) => Ok(page),
            Err(e) => {
                self.slots.add_permits(1);
                Err(e)
            }
        }
    }

    async fn release(&self, owner: &str, page: Box<dyn Page>) {
        self.inner.release(owner, page).await;
        self.slots.add_permits(1);
    }
}
