//! Postgres-backed repository implementations.

mod catalogs;
mod posts;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::{HealthRepo, PostQueryFilter, RepoError};

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    /// Appends one `AND` predicate per present criterion. Expects the posts
    /// table aliased as `p` and a preceding `WHERE` clause.
    fn apply_post_filter<'q>(qb: &mut QueryBuilder<'q, Postgres>, filter: &'q PostQueryFilter) {
        qb.push(" AND p.is_page = ");
        qb.push_bind(filter.is_page);

        if let Some(title) = filter.title.as_deref() {
            qb.push(" AND strpos(p.title, ");
            qb.push_bind(title);
            qb.push(") > 0");
        }

        if let Some(catalog) = filter.catalog.as_deref() {
            qb.push(" AND p.catalog_id = ");
            qb.push_bind(catalog);
        }

        if let Some(tag) = filter.tag.as_deref() {
            qb.push(" AND EXISTS (SELECT 1 FROM post_tags pt WHERE pt.post_id = p.id AND pt.tag = ");
            qb.push_bind(tag);
            qb.push(")");
        }

        if let Some(from) = filter.from {
            qb.push(" AND p.time >= ");
            qb.push_bind(from);
        }

        if let Some(to) = filter.to {
            qb.push(" AND p.time <= ");
            qb.push_bind(to);
        }
    }

    fn convert_count(value: i64) -> Result<u64, RepoError> {
        value
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    fn clamp_to_i64(value: u64) -> i64 {
        i64::try_from(value).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl HealthRepo for PostgresRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}
