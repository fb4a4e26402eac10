use async_trait::async_trait;

use crate::application::repos::{CatalogsRepo, RepoError};
use crate::domain::entities::CatalogRecord;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CatalogRow {
    id: String,
    display: String,
    priority: i32,
}

impl From<CatalogRow> for CatalogRecord {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            display: row.display,
            priority: row.priority,
        }
    }
}

#[async_trait]
impl CatalogsRepo for PostgresRepositories {
    async fn list_catalogs(&self) -> Result<Vec<CatalogRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT id, display, priority
            FROM catalogs
            ORDER BY priority DESC, id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CatalogRecord::from).collect())
    }

    async fn catalog_exists(&self, id: &str) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM catalogs WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}
