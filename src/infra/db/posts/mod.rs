mod read;
mod write;

use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{CatalogRecord, PostRecord};

/// Columns selected for a post joined with its catalog.
pub(super) const POST_COLUMNS: &str = "p.id, p.slug, p.title, p.content, p.summary, p.is_page, \
     p.time, c.id AS catalog_id, c.display AS catalog_display, c.priority AS catalog_priority";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) summary: String,
    pub(crate) is_page: bool,
    pub(crate) time: OffsetDateTime,
    pub(crate) catalog_id: String,
    pub(crate) catalog_display: String,
    pub(crate) catalog_priority: i32,
}

impl PostRow {
    pub(crate) fn into_record(self, tags: Vec<String>) -> PostRecord {
        PostRecord {
            id: self.id,
            slug: self.slug,
            title: self.title,
            content: self.content,
            summary: self.summary,
            is_page: self.is_page,
            time: self.time,
            catalog: CatalogRecord {
                id: self.catalog_id,
                display: self.catalog_display,
                priority: self.catalog_priority,
            },
            tags,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostTagRow {
    pub(crate) post_id: Uuid,
    pub(crate) tag: String,
}

/// Attach tags to their posts, preserving row order on both sides.
pub(crate) fn attach_tags(rows: Vec<PostRow>, tag_rows: Vec<PostTagRow>) -> Vec<PostRecord> {
    let mut tags_by_post: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in tag_rows {
        tags_by_post.entry(row.post_id).or_default().push(row.tag);
    }

    rows.into_iter()
        .map(|row| {
            let tags = tags_by_post.remove(&row.id).unwrap_or_default();
            row.into_record(tags)
        })
        .collect()
}
