//! Domain entities mirrored from persistent storage.

use folio_api_types::{CatalogView, PostView};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub id: String,
    pub display: String,
    pub priority: i32,
}

/// A post joined with its catalog and its tags in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub is_page: bool,
    pub time: OffsetDateTime,
    pub catalog: CatalogRecord,
    pub tags: Vec<String>,
}

impl PostRecord {
    /// View used by listings: `content` carries the summary.
    pub fn into_summary_view(self) -> PostView {
        let content = self.summary.clone();
        self.into_view_with(content)
    }

    /// View used by single-post lookups: `content` carries the full body.
    pub fn into_full_view(self) -> PostView {
        let content = self.content.clone();
        self.into_view_with(content)
    }

    fn into_view_with(self, content: String) -> PostView {
        PostView {
            id: self.id,
            url: self.slug,
            title: self.title,
            time: self.time,
            catalog: self.catalog.into(),
            tags: self.tags,
            content,
            is_page: self.is_page,
        }
    }
}

impl From<CatalogRecord> for CatalogView {
    fn from(record: CatalogRecord) -> Self {
        CatalogView {
            id: record.id,
            display: record.display,
            priority: record.priority,
        }
    }
}
