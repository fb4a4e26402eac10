//! Post and catalog handlers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_api_types::{CatalogView, PagedResponse, PostView};

use crate::application::auth::Caller;
use crate::application::posts::PostMutation;

use super::error::ApiError;
use super::models::{PostListQuery, PostWriteFields};
use super::state::ApiState;

pub async fn list_posts(
    State(state): State<ApiState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PagedResponse<PostView>>, ApiError> {
    let (filter, page) = query.into_parts();
    let page = state.posts.list(filter, page).await?;

    Ok(Json(page.map(|post| post.into_summary_view()).into()))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<Option<PostView>>, ApiError> {
    let post = state.posts.find_by_slug(&slug).await?;
    Ok(Json(post.map(|post| post.into_full_view())))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Extension(caller): Extension<Caller>,
    Path(slug): Path<String>,
    PostWriteFields(form): PostWriteFields,
) -> Result<Response, ApiError> {
    let outcome = state
        .posts
        .create_post(&caller, form.into_create(slug))
        .await?;
    mutation_response(outcome, StatusCode::CREATED)
}

pub async fn update_post(
    State(state): State<ApiState>,
    Extension(caller): Extension<Caller>,
    Path(slug): Path<String>,
    PostWriteFields(form): PostWriteFields,
) -> Result<Response, ApiError> {
    let outcome = state
        .posts
        .update_post(&caller, form.into_update(slug))
        .await?;
    mutation_response(outcome, StatusCode::OK)
}

pub async fn list_catalogs(
    State(state): State<ApiState>,
) -> Result<Json<Vec<CatalogView>>, ApiError> {
    let catalogs = state.posts.list_catalogs().await?;
    Ok(Json(catalogs.into_iter().map(CatalogView::from).collect()))
}

fn mutation_response(outcome: PostMutation, success: StatusCode) -> Result<Response, ApiError> {
    match ApiError::from_rejection(outcome) {
        Some(error) => Err(error),
        None => Ok((success, Json(outcome.saved_id())).into_response()),
    }
}
