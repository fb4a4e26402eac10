#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use folio::application::auth::{TokenAuthenticator, TokenCredential};
use folio::application::pagination::PageRequest;
use folio::application::posts::PostService;
use folio::application::repos::{
    CatalogsRepo, CreatePostParams, HealthRepo, POSTS_SLUG_CONSTRAINT, PostQueryFilter, PostsRepo,
    PostsWriteRepo, RepoError, UpdatePostParams,
};
use folio::domain::entities::{CatalogRecord, PostRecord};
use folio::domain::summary::truncate_content;
use folio::infra::http::ApiState;

pub const EDITOR_TOKEN: &str = "editor-token";

/// Store with the same observable behavior as the Postgres adapter.
#[derive(Default)]
pub struct InMemoryStore {
    catalogs: Mutex<Vec<CatalogRecord>>,
    posts: Mutex<Vec<PostRecord>>,
    unhealthy: AtomicBool,
}

impl InMemoryStore {
    pub fn with_catalogs(catalogs: &[(&str, &str, i32)]) -> Arc<Self> {
        let records = catalogs
            .iter()
            .map(|(id, display, priority)| CatalogRecord {
                id: id.to_string(),
                display: display.to_string(),
                priority: *priority,
            })
            .collect();
        Arc::new(Self {
            catalogs: Mutex::new(records),
            ..Default::default()
        })
    }

    pub async fn seed_post(&self, seed: SeedPost<'_>) -> Uuid {
        let catalog = self.catalog(seed.catalog).await.expect("seeded catalog");
        let id = Uuid::new_v4();
        self.posts.lock().await.push(PostRecord {
            id,
            slug: seed.slug.to_string(),
            title: seed.title.to_string(),
            content: seed.content.to_string(),
            summary: truncate_content(Some(seed.content)),
            is_page: seed.is_page,
            time: seed.time,
            catalog,
            tags: seed.tags.iter().map(|tag| tag.to_string()).collect(),
        });
        id
    }

    pub async fn post(&self, slug: &str) -> Option<PostRecord> {
        self.posts
            .lock()
            .await
            .iter()
            .find(|post| post.slug == slug)
            .cloned()
    }

    pub async fn post_count(&self) -> usize {
        self.posts.lock().await.len()
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.unhealthy.store(!healthy, Ordering::SeqCst);
    }

    async fn catalog(&self, id: &str) -> Option<CatalogRecord> {
        self.catalogs
            .lock()
            .await
            .iter()
            .find(|catalog| catalog.id == id)
            .cloned()
    }

    fn matches(post: &PostRecord, filter: &PostQueryFilter) -> bool {
        post.is_page == filter.is_page
            && filter
                .title
                .as_deref()
                .is_none_or(|title| post.title.contains(title))
            && filter
                .catalog
                .as_deref()
                .is_none_or(|catalog| post.catalog.id == catalog)
            && filter
                .tag
                .as_deref()
                .is_none_or(|tag| post.tags.iter().any(|t| t == tag))
            && filter.from.is_none_or(|from| post.time >= from)
            && filter.to.is_none_or(|to| post.time <= to)
    }
}

pub struct SeedPost<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub catalog: &'a str,
    pub content: &'a str,
    pub tags: &'a [&'a str],
    pub is_page: bool,
    pub time: OffsetDateTime,
}

impl<'a> SeedPost<'a> {
    pub fn new(slug: &'a str, catalog: &'a str, time: OffsetDateTime) -> Self {
        Self {
            slug,
            title: slug,
            catalog,
            content: "",
            tags: &[],
            is_page: false,
            time,
        }
    }
}

#[async_trait]
impl PostsRepo for InMemoryStore {
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut matching: Vec<PostRecord> = self
            .posts
            .lock()
            .await
            .iter()
            .filter(|post| Self::matches(post, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.time.cmp(&a.time).then(b.id.cmp(&a.id)));

        Ok(matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count_posts(&self, filter: &PostQueryFilter) -> Result<u64, RepoError> {
        let posts = self.posts.lock().await;
        Ok(posts.iter().filter(|post| Self::matches(post, filter)).count() as u64)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.post(slug).await)
    }

    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>, RepoError> {
        Ok(self.post(slug).await.map(|post| post.id))
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<Uuid, RepoError> {
        let catalog = self
            .catalog(&params.catalog_id)
            .await
            .ok_or_else(|| RepoError::InvalidInput {
                message: "catalog does not exist".to_string(),
            })?;

        let mut posts = self.posts.lock().await;
        if posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: POSTS_SLUG_CONSTRAINT.to_string(),
            });
        }

        let id = Uuid::new_v4();
        posts.push(PostRecord {
            id,
            slug: params.slug,
            title: params.title,
            content: params.content,
            summary: params.summary,
            is_page: params.is_page,
            time: params.time,
            catalog,
            tags: params.tags,
        });
        Ok(id)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<Uuid, RepoError> {
        let catalog = self
            .catalog(&params.catalog_id)
            .await
            .ok_or_else(|| RepoError::InvalidInput {
                message: "catalog does not exist".to_string(),
            })?;

        let mut posts = self.posts.lock().await;
        if posts
            .iter()
            .any(|post| post.slug == params.slug && post.id != params.id)
        {
            return Err(RepoError::Duplicate {
                constraint: POSTS_SLUG_CONSTRAINT.to_string(),
            });
        }

        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;

        post.slug = params.slug;
        post.title = params.title;
        post.content = params.content;
        post.summary = params.summary;
        post.is_page = params.is_page;
        post.catalog = catalog;
        post.tags = params.tags;
        Ok(post.id)
    }
}

#[async_trait]
impl CatalogsRepo for InMemoryStore {
    async fn list_catalogs(&self) -> Result<Vec<CatalogRecord>, RepoError> {
        let mut catalogs = self.catalogs.lock().await.clone();
        catalogs.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        Ok(catalogs)
    }

    async fn catalog_exists(&self, id: &str) -> Result<bool, RepoError> {
        Ok(self.catalog(id).await.is_some())
    }
}

#[async_trait]
impl HealthRepo for InMemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            Err(RepoError::from_persistence("connection refused"))
        } else {
            Ok(())
        }
    }
}

pub fn post_service(store: Arc<InMemoryStore>) -> PostService {
    PostService::new(store.clone(), store.clone(), store)
}

pub fn editor_authenticator() -> TokenAuthenticator {
    TokenAuthenticator::new(vec![TokenCredential {
        name: "editor".to_string(),
        digest: TokenAuthenticator::hash_token(EDITOR_TOKEN),
    }])
}

pub fn api_state(store: Arc<InMemoryStore>) -> ApiState {
    ApiState {
        posts: Arc::new(post_service(store.clone())),
        authenticator: Arc::new(editor_authenticator()),
        health: store,
    }
}
