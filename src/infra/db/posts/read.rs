use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::application::pagination::PageRequest;
use crate::application::repos::{PostQueryFilter, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;

use super::super::{PostgresRepositories, map_sqlx_error};
use super::{POST_COLUMNS, PostRow, PostTagRow, attach_tags};

impl PostgresRepositories {
    async fn load_tags(&self, post_ids: &[Uuid]) -> Result<Vec<PostTagRow>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT post_id, tag
            FROM post_tags
            WHERE post_id = ANY($1)
            ORDER BY post_id, position
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(
        &self,
        filter: &PostQueryFilter,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(" FROM posts p INNER JOIN catalogs c ON c.id = p.catalog_id WHERE 1=1");
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.time DESC, p.id DESC LIMIT ");
        qb.push_bind(Self::clamp_to_i64(page.limit()));
        qb.push(" OFFSET ");
        qb.push_bind(Self::clamp_to_i64(page.offset()));

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let tags = self.load_tags(&ids).await?;

        Ok(attach_tags(rows, tags))
    }

    async fn count_posts(&self, filter: &PostQueryFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p WHERE 1=1");
        Self::apply_post_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p \
             INNER JOIN catalogs c ON c.id = p.catalog_id \
             WHERE p.slug = $1"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tags = self.load_tags(&[row.id]).await?;
        Ok(attach_tags(vec![row], tags).pop())
    }

    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<Uuid>, RepoError> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)
    }
}
