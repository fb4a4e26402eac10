use metrics::counter;
use time::OffsetDateTime;
use tracing::info;

use crate::application::auth::Caller;
use crate::application::repos::{CreatePostParams, RepoError, UpdatePostParams};
use crate::domain::{slug, summary::truncate_content, tags::parse_tag_list};

use super::service::PostService;
use super::types::{CreatePostCommand, PostMutation, PostServiceError, UpdatePostCommand};

pub(crate) const POST_MUTATIONS_METRIC: &str = "folio_post_mutations_total";

impl PostService {
    pub async fn create_post(
        &self,
        caller: &Caller,
        command: CreatePostCommand,
    ) -> Result<PostMutation, PostServiceError> {
        let outcome = self.create_post_inner(caller, command).await?;
        record_outcome("create", caller, &outcome);
        Ok(outcome)
    }

    pub async fn update_post(
        &self,
        caller: &Caller,
        command: UpdatePostCommand,
    ) -> Result<PostMutation, PostServiceError> {
        let outcome = self.update_post_inner(caller, command).await?;
        record_outcome("update", caller, &outcome);
        Ok(outcome)
    }

    async fn create_post_inner(
        &self,
        caller: &Caller,
        command: CreatePostCommand,
    ) -> Result<PostMutation, PostServiceError> {
        if !caller.is_authenticated() {
            return Ok(PostMutation::Unauthorized);
        }

        if self.reader.slug_exists(&command.slug).await? {
            return Ok(PostMutation::SlugExists);
        }

        if !self.catalogs.catalog_exists(&command.catalog).await? {
            return Ok(PostMutation::CatalogMissing);
        }

        let params = CreatePostParams {
            summary: truncate_content(command.content.as_deref()),
            tags: parse_tag_list(command.tags.as_deref()),
            slug: command.slug,
            title: command.title,
            content: command.content.unwrap_or_default(),
            is_page: command.is_page,
            time: OffsetDateTime::now_utc(),
            catalog_id: command.catalog,
        };

        match self.writer.create_post(params).await {
            Ok(id) => Ok(PostMutation::Saved(id)),
            Err(err) => conflict_or_fault(err),
        }
    }

    async fn update_post_inner(
        &self,
        caller: &Caller,
        command: UpdatePostCommand,
    ) -> Result<PostMutation, PostServiceError> {
        if !caller.is_authenticated() {
            return Ok(PostMutation::Unauthorized);
        }

        let new_slug = slug::non_blank(command.new_slug.as_deref()).map(str::to_string);

        // A blank current slug skips the rename collision check; the lookup
        // below then decides the outcome.
        if !slug::is_blank(&command.slug)
            && let Some(candidate) = new_slug.as_deref()
            && candidate != command.slug
            && self.reader.slug_exists(candidate).await?
        {
            return Ok(PostMutation::SlugExists);
        }

        if !self.catalogs.catalog_exists(&command.catalog).await? {
            return Ok(PostMutation::CatalogMissing);
        }

        let Some(id) = self.reader.find_id_by_slug(&command.slug).await? else {
            return Ok(PostMutation::PostNotFound);
        };

        let params = UpdatePostParams {
            id,
            summary: truncate_content(command.content.as_deref()),
            tags: parse_tag_list(command.tags.as_deref()),
            slug: new_slug.unwrap_or(command.slug),
            title: command.title,
            content: command.content.unwrap_or_default(),
            is_page: command.is_page,
            catalog_id: command.catalog,
        };

        match self.writer.update_post(params).await {
            Ok(id) => Ok(PostMutation::Saved(id)),
            Err(RepoError::NotFound) => Ok(PostMutation::PostNotFound),
            Err(err) => conflict_or_fault(err),
        }
    }
}

fn conflict_or_fault(err: RepoError) -> Result<PostMutation, PostServiceError> {
    if err.is_slug_conflict() {
        Ok(PostMutation::SlugExists)
    } else {
        Err(err.into())
    }
}

fn record_outcome(operation: &'static str, caller: &Caller, outcome: &PostMutation) {
    counter!(
        POST_MUTATIONS_METRIC,
        "operation" => operation,
        "outcome" => outcome.as_str()
    )
    .increment(1);

    match outcome {
        PostMutation::Saved(id) => info!(
            target = "folio::posts",
            operation,
            actor = caller.actor_label(),
            post_id = %id,
            "post saved"
        ),
        rejected => info!(
            target = "folio::posts",
            operation,
            actor = caller.actor_label(),
            outcome = rejected.as_str(),
            "post mutation rejected"
        ),
    }
}
