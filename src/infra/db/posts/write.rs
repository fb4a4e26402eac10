use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostsWriteRepo, RepoError, UpdatePostParams};

use super::super::{PostgresRepositories, map_sqlx_error};

async fn insert_tags(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    tags: &[String],
) -> Result<(), RepoError> {
    if tags.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO post_tags (post_id, position, tag)
        SELECT $1, (t.ord - 1)::int4, t.tag
        FROM UNNEST($2::text[]) WITH ORDINALITY AS t(tag, ord)
        "#,
    )
    .bind(post_id)
    .bind(tags)
    .execute(&mut **tx)
    .await
    .map_err(map_sqlx_error)?;

    Ok(())
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<Uuid, RepoError> {
        let CreatePostParams {
            slug,
            title,
            content,
            summary,
            is_page,
            time,
            catalog_id,
            tags,
        } = params;

        let id = Uuid::new_v4();
        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, slug, title, content, summary, is_page, time, catalog_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(id)
        .bind(&slug)
        .bind(&title)
        .bind(&content)
        .bind(&summary)
        .bind(is_page)
        .bind(time)
        .bind(&catalog_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        insert_tags(&mut tx, id, &tags).await?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(id)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<Uuid, RepoError> {
        let UpdatePostParams {
            id,
            slug,
            title,
            content,
            summary,
            is_page,
            catalog_id,
            tags,
        } = params;

        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE posts
               SET slug = $2,
                   title = $3,
                   content = $4,
                   summary = $5,
                   is_page = $6,
                   catalog_id = $7
             WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&slug)
        .bind(&title)
        .bind(&content)
        .bind(&summary)
        .bind(is_page)
        .bind(&catalog_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx_error)?
        .ok_or(RepoError::NotFound)?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(updated)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        insert_tags(&mut tx, updated, &tags).await?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(updated)
    }
}
