use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, header};
use axum::middleware::Next;
use axum::response::Response;

use super::state::ApiState;

/// Resolves the request's credentials into a [`Caller`](crate::application::auth::Caller).
///
/// Missing or unknown tokens are not rejected here: reads are public and the
/// post service decides what an anonymous caller may do.
pub async fn resolve_caller(
    State(state): State<ApiState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request_token(request.headers());
    let caller = state.authenticator.authenticate(token.as_deref());

    request.extensions_mut().insert(caller.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(caller);
    response
}

fn request_token(headers: &HeaderMap) -> Option<String> {
    extract_bearer(headers.get(header::AUTHORIZATION)).or_else(|| {
        headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok().map(|s| s.to_string()))
    })
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.trim().to_string())
}
