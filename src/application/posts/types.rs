use thiserror::Error;
use uuid::Uuid;

use crate::application::repos::RepoError;

/// Store faults; business rejections are reported through [`PostMutation`].
#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Result of a create or update request that reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostMutation {
    Saved(Uuid),
    Unauthorized,
    SlugExists,
    CatalogMissing,
    PostNotFound,
}

impl PostMutation {
    pub fn saved_id(&self) -> Option<Uuid> {
        match self {
            PostMutation::Saved(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostMutation::Saved(_) => "saved",
            PostMutation::Unauthorized => "unauthorized",
            PostMutation::SlugExists => "slug_exists",
            PostMutation::CatalogMissing => "catalog_missing",
            PostMutation::PostNotFound => "post_not_found",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub slug: String,
    pub catalog: String,
    pub title: String,
    /// Comma-separated tag list.
    pub tags: Option<String>,
    pub content: Option<String>,
    pub is_page: bool,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    /// Slug of the post being edited.
    pub slug: String,
    /// Replacement slug; blank values leave the slug unchanged.
    pub new_slug: Option<String>,
    pub catalog: String,
    pub title: String,
    pub tags: Option<String>,
    pub content: Option<String>,
    pub is_page: bool,
}
