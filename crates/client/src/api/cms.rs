//! CMS content pages.

use shopx_core::CmsPage;
use shopx_core::normalize::{normalize_cms_page, normalize_cms_pages};
use tracing::instrument;

use super::{CachedQuery, ShopxApi};
use crate::cache::{CacheValue, Tag, TagId, TagKind};
use crate::error::{Result, ShopxError};
use crate::graphql::{
    GetCmsPage, GetCmsPageData, GetCmsPageVariables, GetCmsPages, GetCmsPagesData, NoVariables,
};
use crate::transport::Transport;

impl CachedQuery for GetCmsPage {
    type Output = Option<CmsPage>;

    fn normalize(data: GetCmsPageData) -> Self::Output {
        normalize_cms_page(&data.get_cms_page)
    }

    fn provides(output: &Self::Output) -> Vec<Tag> {
        vec![match output {
            Some(page) => Tag::entity(TagKind::Cms, page.id.as_str()),
            None => Tag::new(TagKind::Cms, TagId::Page),
        }]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::CmsPage(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::CmsPage(page) => Some(page),
            _ => None,
        }
    }
}

impl CachedQuery for GetCmsPages {
    type Output = Vec<CmsPage>;

    fn normalize(data: GetCmsPagesData) -> Self::Output {
        normalize_cms_pages(&data.get_cms_pages)
    }

    fn provides(_output: &Self::Output) -> Vec<Tag> {
        vec![Tag::list(TagKind::Cms)]
    }

    fn into_cache(output: Self::Output) -> CacheValue {
        CacheValue::CmsPages(output)
    }

    fn from_cache(value: CacheValue) -> Option<Self::Output> {
        match value {
            CacheValue::CmsPages(pages) => Some(pages),
            _ => None,
        }
    }
}

impl<T: Transport> ShopxApi<T> {
    /// Fetch a page by slug. An unknown slug yields `None`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty slug, otherwise any request
    /// error.
    #[instrument(skip(self))]
    pub async fn get_cms_page(&self, slug: &str) -> Result<Option<CmsPage>> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ShopxError::validation("slug cannot be empty"));
        }
        self.query::<GetCmsPage>(GetCmsPageVariables {
            slug: slug.to_string(),
        })
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cms_pages(&self) -> Result<Vec<CmsPage>> {
        self.query::<GetCmsPages>(NoVariables {}).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use shopx_core::CmsStatus;

    use super::*;
    use crate::api::test_support::Scripted;
    use crate::cache::QueryCache;
    use crate::graphql::Operation;
    use crate::store::Store;

    fn api(transport: Arc<Scripted>) -> ShopxApi<Arc<Scripted>> {
        ShopxApi::new(
            transport,
            Store::in_memory(),
            QueryCache::new(10, Duration::from_secs(60)),
        )
    }

    #[tokio::test]
    async fn test_page_by_slug() {
        let transport = Arc::new(Scripted::new().on(
            Operation::GetCmsPage,
            Ok(json!({"getCmsPage": {
                "id": "cms-1", "slug": "despre", "title": "Despre", "body": "...",
                "status": "PUBLISHED", "updatedAt": "2024-01-01T00:00:00Z"
            }})),
        ));
        let api = api(Arc::clone(&transport));

        let page = api.get_cms_page(" despre ").await.unwrap().unwrap();
        assert_eq!(page.status, CmsStatus::Published);
        assert!(page.is_visible());
        assert_eq!(
            GetCmsPage::provides(&Some(page)),
            vec![Tag::entity(TagKind::Cms, "cms-1")]
        );
        assert_eq!(transport.requests.lock()[0].variables, json!({"slug": "despre"}));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_none() {
        let transport = Arc::new(
            Scripted::new().on(Operation::GetCmsPage, Ok(json!({"getCmsPage": null}))),
        );
        let api = api(transport);

        let page = api.get_cms_page("nope").await.unwrap();
        assert!(page.is_none());
        assert_eq!(
            GetCmsPage::provides(&page),
            vec![Tag::new(TagKind::Cms, TagId::Page)]
        );
        assert!(matches!(
            api.get_cms_page("  ").await,
            Err(ShopxError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_pages_skip_non_records() {
        let transport = Arc::new(Scripted::new().on(
            Operation::GetCmsPages,
            Ok(json!({"getCmsPages": [{"id": "a", "slug": "a"}, null, 3]})),
        ));
        let api = api(transport);

        assert_eq!(api.get_cms_pages().await.unwrap().len(), 1);
    }
}
