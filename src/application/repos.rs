//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::domain::entities::{CatalogRecord, PostRecord};

/// Unique constraint guarding post slugs.
pub const POSTS_SLUG_CONSTRAINT: &str = "posts_slug_key";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    /// Whether the error is a lost race on the slug uniqueness constraint.
    pub fn is_slug_conflict(&self) -> bool {
        matches!(self, RepoError::Duplicate { constraint } if constraint == POSTS_SLUG_CONSTRAINT)
    }
}

/// Listing criteria; every present criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQueryFilter {
    pub title: Option<String>,
    pub catalog: Option<String>,
    pub tag: Option<String>,
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
    pub is_page: bool,
}

impl PostQueryFilter {
    /// Drops empty text criteria so they do not constrain the listing.
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|value| !value.is_empty())
        }

        Self {
            title: present(self.title),
            catalog: present(self.catalog),
            tag: present(self.tag),
            ..self
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub is_page: bool,
    pub time: OffsetDateTime,
    pub catalog_id: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub is_page: bool,
    pub catalog_id: String,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts matching `filter`, newest first, restricted to `page`.
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, RepoError>;

    async fn count_posts(&self, filter: &PostQueryFilter) -> Result<u64, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        Ok(self.find_id_by_slug(slug).await?.is_some())
    }
}

/// Mutations persist the post row and its full tag set as one unit.
#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<Uuid, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<Uuid, RepoError>;
}

#[async_trait]
pub trait CatalogsRepo: Send + Sync {
    async fn list_catalogs(&self) -> Result<Vec<CatalogRecord>, RepoError>;

    async fn catalog_exists(&self, id: &str) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
