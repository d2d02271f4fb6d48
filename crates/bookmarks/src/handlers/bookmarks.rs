//! Bookmark CRUD handlers.
//!
//! Bodies are validated into a `Bookmark` before the service runs; store
//! outcomes become status codes plus `ETag` / `Location` headers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use bookmarks_core::bookmark::{Bookmark, BookmarkError, ETag, UpdateOutcome};

use crate::{
    handlers::{error::ProblemDetails, AppError},
    models::BookmarkRequest,
    state::AppState,
};

/// Unwraps a JSON body, turning parse failures into a validation error.
fn parse_body(
    body: Result<Json<BookmarkRequest>, JsonRejection>,
) -> Result<Bookmark, AppError> {
    let Json(payload) = body.map_err(|e| BookmarkError::InvalidBody(e.body_text()))?;
    Ok(payload.into_bookmark()?)
}

fn etag_header(bookmark: &Bookmark) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    if let Some(etag) = &bookmark.etag {
        headers.insert(header::ETAG, HeaderValue::from_str(etag.as_str())?);
    }
    Ok(headers)
}

/// Path of a single bookmark, with both segments percent-encoded.
fn location(user_id: &str, id: &str) -> String {
    format!(
        "/bookmarks/{}/{}",
        urlencoding::encode(user_id),
        urlencoding::encode(id)
    )
}

fn not_found(user_id: &str, id: &str) -> Response {
    ProblemDetails::new(
        StatusCode::NOT_FOUND,
        "Bookmark not found",
        format!("No bookmark with id '{id}' for user '{user_id}'."),
    )
    .into_response()
}

/// Create a bookmark (POST /bookmarks).
pub async fn create_bookmark(
    State(state): State<AppState>,
    body: Result<Json<BookmarkRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let bookmark = parse_body(body)?;
    let created = state.bookmarks.create(bookmark).await?;

    tracing::info!(user_id = %created.user_id, id = %created.id, "Created bookmark");

    let mut headers = etag_header(&created)?;
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&location(&created.user_id, &created.id))?,
    );

    Ok((StatusCode::CREATED, headers, Json(created)).into_response())
}

/// Get one bookmark (GET /bookmarks/{user_id}/{id}).
pub async fn get_bookmark(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    match state.bookmarks.get_by_id(&user_id, &id).await? {
        Some(bookmark) => {
            let headers = etag_header(&bookmark)?;
            Ok((StatusCode::OK, headers, Json(bookmark)).into_response())
        }
        None => Ok(not_found(&user_id, &id)),
    }
}

/// List every bookmark of a user (GET /bookmarks/user/{user_id}).
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let bookmarks = state.bookmarks.list_by_user(&user_id).await?;
    Ok(Json(bookmarks))
}

/// Replace a bookmark (PUT /bookmarks), honoring `If-Match`.
pub async fn update_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<BookmarkRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let bookmark = parse_body(body)?;
    // Non-ASCII bytes still form a condition; no stored token can match them.
    let if_match = headers
        .get(header::IF_MATCH)
        .map(|value| String::from_utf8_lossy(value.as_bytes()));
    let expected = ETag::from_if_match(if_match.as_deref());

    match state.bookmarks.update(bookmark, expected).await? {
        UpdateOutcome::Updated(updated) => {
            tracing::info!(user_id = %updated.user_id, id = %updated.id, "Updated bookmark");
            let headers = etag_header(&updated)?;
            Ok((StatusCode::OK, headers, Json(updated)).into_response())
        }
        UpdateOutcome::PreconditionFailed => Ok(ProblemDetails::new(
            StatusCode::PRECONDITION_FAILED,
            "ETag precondition failed",
            "The resource has been modified by someone else. Re-fetch and retry.",
        )
        .into_response()),
    }
}

/// Delete a bookmark (DELETE /bookmarks/{user_id}/{id}).
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    if state.bookmarks.delete(&user_id, &id).await? {
        tracing::info!(user_id = %user_id, id = %id, "Deleted bookmark");
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(not_found(&user_id, &id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_encodes_segments() {
        assert_eq!(location("u1", "b1"), "/bookmarks/u1/b1");
        assert_eq!(location("a b", "x/y"), "/bookmarks/a%20b/x%2Fy");
    }

    #[test]
    fn test_etag_header_is_verbatim() {
        let bookmark = Bookmark::new("b1", "u1", "Rust", "https://x.dev")
            .with_etag(ETag::new("\"abc\""));
        let headers = etag_header(&bookmark).unwrap();
        assert_eq!(headers[header::ETAG], "\"abc\"");
    }
}
