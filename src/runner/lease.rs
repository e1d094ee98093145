//! Page-handle recycling
//!
//! A lease borrows one page at a time from the pool, acquires it lazily, and
//! returns it after `limit` visits so a fresh one is taken on the next need.

use crate::browser::{Page, PagePool};
use crate::HarvestError;

pub(crate) struct PageLease<'a> {
    pool: &'a dyn PagePool,
    owner: &'a str,
    limit: usize,
    page: Option<Box<dyn Page>>,
    used: usize,
}

impl<'a> PageLease<'a> {
    pub(crate) fn new(pool: &'a dyn PagePool, owner: &'a str, limit: usize) -> Self {
        Self {
            pool,
            owner,
            limit,
            page: None,
            used: 0,
        }
    }

    /// The held page, acquiring one from the pool if none is held
    pub(crate) async fn page(&mut self) -> Result<&mut dyn Page, HarvestError> {
        let page = match self.page.take() {
            Some(page) => page,
            None => {
                let page = self.pool.acquire(self.owner).await?;
                self.used = 0;
                page
            }
        };
        Ok(&mut **self.page.insert(page))
    }

    /// Counts one visit on the held page, recycling it once the limit is hit
    pub(crate) async fn visited(&mut self) {
        self.used += 1;
        if self.used >= self.limit {
            if let Some(page) = self.page.take() {
                self.pool.release(self.owner, page).await;
            }
            self.used = 0;
        }
    }

    /// Returns the held page, if any
    pub(crate) async fn close(mut self) {
        if let Some(page) = self.page.take() {
            self.pool.release(self.owner, page).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullPage;

    #[async_trait]
    impl Page for NullPage {
        async fn navigate(&mut self, _uri: &str) -> Result<(), HarvestError> {
            Ok(())
        }

        async fn content(&mut self) -> Result<String, HarvestError> {
            Ok(String::new())
        }

        fn url(&self) -> Option<&str> {
            None
        }
    }

    #[derive(Default)]
    struct CountingPool {
        acquired: AtomicUsize,
        released: AtomicUsize,
    }

    #[async_trait]
    impl PagePool for CountingPool {
        async fn acquire(&self, _owner: &str) -> Result<Box<dyn Page>, HarvestError> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NullPage))
        }

        async fn release(&self, _owner: &str, _page: Box<dyn Page>) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn visit(pool: &CountingPool, limit: usize, visits: usize) {
        let mut lease = PageLease::new(pool, "test", limit);
        for _ in 0..visits {
            lease.page().await.unwrap().navigate("http://a").await.unwrap();
            lease.visited().await;
        }
        lease.close().await;
    }

    #[tokio::test]
    async fn test_recycles_after_limit() {
        let pool = CountingPool::default();
        visit(&pool, 2, 4).await;

        assert_eq!(pool.acquired.load(Ordering::SeqCst), 2);
        assert_eq!(pool.released.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_releases_partial_lease_on_close() {
        let pool = CountingPool::default();
        visit(&pool, 5, 7).await;

        assert_eq!(pool.acquired.load(Ordering::SeqCst), 2);
        assert_eq!(pool.released.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unused_lease_acquires_nothing() {
        let pool = CountingPool::default();
        visit(&pool, 3, 0).await;

        assert_eq!(pool.acquired.load(Ordering::SeqCst), 0);
        assert_eq!(pool.released.load(Ordering::SeqCst), 0);
    }
}
