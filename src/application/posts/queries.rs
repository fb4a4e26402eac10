use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::PostQueryFilter;
use crate::domain::entities::{CatalogRecord, PostRecord};

use super::service::PostService;
use super::types::PostServiceError;

impl PostService {
    /// One page of posts matching `filter`, newest first.
    ///
    /// Totals describe the whole filtered set, so a page past the end comes
    /// back empty with the same totals.
    pub async fn list(
        &self,
        filter: PostQueryFilter,
        page: u32,
    ) -> Result<Page<PostRecord>, PostServiceError> {
        let filter = filter.normalized();
        let request = PageRequest::posts(page);

        let total = self.reader.count_posts(&filter).await?;
        let items = if request.offset() >= total {
            Vec::new()
        } else {
            self.reader.list_posts(&filter, request).await?
        };

        Ok(Page::new(items, request, total))
    }

    /// `None` is the regular outcome for an unknown slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, PostServiceError> {
        Ok(self.reader.find_by_slug(slug).await?)
    }

    pub async fn list_catalogs(&self) -> Result<Vec<CatalogRecord>, PostServiceError> {
        Ok(self.catalogs.list_catalogs().await?)
    }
}
