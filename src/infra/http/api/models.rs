use axum::body::{Body, to_bytes};
use axum::extract::{Form, FromRequest, FromRequestParts, Query, Request};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::application::posts::{CreatePostCommand, UpdatePostCommand};
use crate::application::repos::PostQueryFilter;

/// Query string of `GET /api/posts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "optional_rfc3339")]
    pub from: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "optional_rfc3339")]
    pub to: Option<OffsetDateTime>,
    pub catalog: Option<String>,
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_page: bool,
    /// Zero-based page index.
    #[serde(default)]
    pub page: u32,
}

impl PostListQuery {
    pub fn into_parts(self) -> (PostQueryFilter, u32) {
        let filter = PostQueryFilter {
            title: self.title,
            catalog: self.catalog,
            tag: self.tag,
            from: self.from,
            to: self.to,
            is_page: self.is_page,
        };
        (filter, self.page)
    }
}

/// Fields shared by the create and update endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWriteForm {
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub title: String,
    pub tags: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_page: bool,
    /// Only read by updates.
    pub new_url: Option<String>,
}

impl PostWriteForm {
    pub fn into_create(self, slug: String) -> CreatePostCommand {
        CreatePostCommand {
            slug,
            catalog: self.catalog,
            title: self.title,
            tags: self.tags,
            content: self.content,
            is_page: self.is_page,
        }
    }

    pub fn into_update(self, slug: String) -> UpdatePostCommand {
        UpdatePostCommand {
            slug,
            new_slug: self.new_url,
            catalog: self.catalog,
            title: self.title,
            tags: self.tags,
            content: self.content,
            is_page: self.is_page,
        }
    }
}

const WRITE_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Write fields taken from a form body, or from the query string when the
/// request carries no form body.
#[derive(Debug)]
pub struct PostWriteFields(pub PostWriteForm);

impl<S> FromRequest<S> for PostWriteFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let (mut parts, body) = req.into_parts();
        let bytes = to_bytes(body, WRITE_BODY_LIMIT).await.map_err(|_| {
            (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response()
        })?;

        if is_form && !bytes.is_empty() {
            let req = Request::from_parts(parts, Body::from(bytes));
            let Form(form) = Form::<PostWriteForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(form));
        }

        let Query(form) = Query::<PostWriteForm>::from_request_parts(&mut parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(form))
    }
}

/// Accepts `true`/`false` in any letter case; an empty value is `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "" => Ok(false),
        value if value.eq_ignore_ascii_case("true") => Ok(true),
        value if value.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid boolean `{other}`"))),
    }
}

fn optional_rfc3339<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => OffsetDateTime::parse(value, &Rfc3339)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
