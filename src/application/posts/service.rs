use std::sync::Arc;

use crate::application::repos::{CatalogsRepo, PostsRepo, PostsWriteRepo};

/// Lists, looks up, creates and edits posts.
#[derive(Clone)]
pub struct PostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) catalogs: Arc<dyn CatalogsRepo>,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        catalogs: Arc<dyn CatalogsRepo>,
    ) -> Self {
        Self {
            reader,
            writer,
            catalogs,
        }
    }
}
