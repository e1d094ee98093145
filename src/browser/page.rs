use crate::HarvestError;
use async_trait::async_trait;
use std::sync::Arc;

/// A navigable browsing context borrowed from a [`PagePool`]
#[async_trait]
pub trait Page: Send {
    /// Loads `uri` and waits until the document has settled
    ///
    /// Fails with [`HarvestError::Navigation`] on timeout or network failure.
    async fn navigate(&mut self, uri: &str) -> Result<(), HarvestError>;

    /// Returns the markup of the currently loaded document
    ///
    /// Fails with [`HarvestError::Extraction`] when nothing has been loaded.
    async fn content(&mut self) -> Result<String, HarvestError>;

    /// Address of the currently loaded document, after redirects
    fn url(&self) -> Option<&str>;
}

/// Lends out and reclaims page handles on behalf of named owners
#[async_trait]
pub trait PagePool: Send + Sync {
    async fn acquire(&self, owner: &str) -> Result<Box<dyn Page>, HarvestError>;

    async fn release(&self, owner: &str, page: Box<dyn Page>);
}

#[async_trait]
impl<P: PagePool + ?Sized> PagePool for Arc<P> {
    async fn acquire(&self, owner: &str) -> Result<Box<dyn Page>, HarvestError> {
        (**self).acquire(owner).await
    }

    async fn release(&self, owner: &str, page: Box<dyn Page>) {
        (**self).release(owner, page).await
    }
}

/// Runs `f` over the current document of `page`
///
/// Any error returned by `f` is reported as an extraction failure on the
/// page's current address.
pub async fn extract<T, F>(page: &mut dyn Page, f: F) -> Result<T, HarvestError>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    let html = page.content().await?;
    let uri = page.url().unwrap_or_default().to_string();
    f(&html).map_err(|message| HarvestError::extraction(uri, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticPage {
        url: Option<String>,
        html: String,
    }

    #[async_trait]
    impl Page for StaticPage {
        async fn navigate(&mut self, uri: &str) -> Result<(), HarvestError> {
            self.url = Some(uri.to_string());
            Ok(())
        }

        async fn content(&mut self) -> Result<String, HarvestError> {
            Ok(self.html.clone())
        }

        fn url(&self) -> Option<&str> {
            self.url.as_deref()
        }
    }

    #[tokio::test]
    async fn test_extract_applies_closure() {
        let mut page = StaticPage {
            url: None,
            html: "<p>hello</p>".to_string(),
        };
        page.navigate("http://a").await.unwrap();

        let len = extract(&mut page, |html| Ok(html.len())).await.unwrap();
        assert_eq!(len, 12);
    }

    #[tokio::test]
    async fn test_extract_maps_failure_to_extraction_error() {
        let mut page = StaticPage {
            url: None,
            html: String::new(),
        };
        page.navigate("http://a/1").await.unwrap();

        let err = extract(&mut page, |_| -> Result<(), String> { Err("no body".into()) })
            .await
            .unwrap_err();

        match err {
            HarvestError::Extraction { uri, message } => {
                assert_eq!(uri, "http://a/1");
                assert_eq!(message, "no body");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
