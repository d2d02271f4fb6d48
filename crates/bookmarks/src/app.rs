use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        bookmarks::{
            create_bookmark, delete_bookmark, get_bookmark, list_bookmarks, update_bookmark,
        },
        health::livez,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::IF_MATCH])
        .expose_headers([header::ETAG, header::LOCATION]);

    let bookmark_routes = Router::new()
        .route("/bookmarks", post(create_bookmark).put(update_bookmark))
        // Static segment wins over the {user_id} capture below.
        .route("/bookmarks/user/{user_id}", get(list_bookmarks))
        .route(
            "/bookmarks/{user_id}/{id}",
            get(get_bookmark).delete(delete_bookmark),
        )
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .merge(bookmark_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn bookmark_json(user_id: &str, id: &str, title: &str) -> Value {
        json!({
            "id": id,
            "userId": user_id,
            "title": title,
            "url": "https://www.rust-lang.org",
            "tags": ["lang"],
        })
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn update_request(body: &Value, if_match: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("PUT")
            .uri("/bookmarks")
            .header("Content-Type", "application/json");
        if let Some(etag) = if_match {
            builder = builder.header("If-Match", etag);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn etag_of(response: &Response) -> String {
        response.headers()[header::ETAG]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::default());

        let response = app.oneshot(empty_request("GET", "/livez")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_returns_location_and_etag() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(json_request(
                "POST",
                "/bookmarks",
                &bookmark_json("u1", "b1", "Rust"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "/bookmarks/u1/b1");
        let etag = etag_of(&response);
        assert!(etag.starts_with('"') && etag.ends_with('"'));

        let json = body_json(response).await;
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["title"], "Rust");
        assert_eq!(json["etag"], etag);
        assert!(json.get("notes").is_none());
    }

    #[tokio::test]
    async fn test_create_update_flow_with_etags() {
        let app = create_app(AppState::default());

        // Create -> t1
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/bookmarks",
                &bookmark_json("u1", "b1", "Rust"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let t1 = etag_of(&response);

        // Get -> t1
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/bookmarks/u1/b1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(etag_of(&response), t1);

        // Update with t1 -> t2
        let response = app
            .clone()
            .oneshot(update_request(
                &bookmark_json("u1", "b1", "Rust Lang"),
                Some(&t1),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let t2 = etag_of(&response);
        assert_ne!(t1, t2);
        assert_eq!(body_json(response).await["title"], "Rust Lang");

        // Update with stale t1 -> 412
        let response = app
            .clone()
            .oneshot(update_request(
                &bookmark_json("u1", "b1", "Lost write"),
                Some(&t1),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        let problem = body_json(response).await;
        assert_eq!(problem["title"], "ETag precondition failed");
        assert_eq!(problem["status"], 412);

        // Stored record is the t2 one
        let response = app
            .oneshot(empty_request("GET", "/bookmarks/u1/b1"))
            .await
            .unwrap();
        assert_eq!(etag_of(&response), t2);
        assert_eq!(body_json(response).await["title"], "Rust Lang");
    }

    #[tokio::test]
    async fn test_update_with_wildcard_or_no_if_match_succeeds() {
        let app = create_app(AppState::default());
        app.clone()
            .oneshot(json_request(
                "POST",
                "/bookmarks",
                &bookmark_json("u1", "b1", "Rust"),
            ))
            .await
            .unwrap();

        for if_match in [Some("*"), None] {
            let response = app
                .clone()
                .oneshot(update_request(&bookmark_json("u1", "b1", "Again"), if_match))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_update_with_non_ascii_if_match_is_precondition_failed() {
        let app = create_app(AppState::default());
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/bookmarks",
                &bookmark_json("u1", "b1", "Rust"),
            ))
            .await
            .unwrap();
        let t1 = etag_of(&response);

        let request = Request::builder()
            .method("PUT")
            .uri("/bookmarks")
            .header("Content-Type", "application/json")
            .header(
                header::IF_MATCH,
                HeaderValue::from_bytes(b"\"t\xE9\"").unwrap(),
            )
            .body(Body::from(bookmark_json("u1", "b1", "Overwrite").to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);

        let response = app
            .oneshot(empty_request("GET", "/bookmarks/u1/b1"))
            .await
            .unwrap();
        assert_eq!(etag_of(&response), t1);
        assert_eq!(body_json(response).await["title"], "Rust");
    }

    #[tokio::test]
    async fn test_duplicate_create_is_conflict() {
        let app = create_app(AppState::default());
        let body = bookmark_json("u1", "b1", "Rust");

        let response = app
            .clone()
            .oneshot(json_request("POST", "/bookmarks", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_request("POST", "/bookmarks", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let problem = body_json(response).await;
        assert_eq!(problem["title"], "Bookmark already exists");
        assert_eq!(
            problem["detail"],
            "A bookmark with id 'b1' for user 'u1' already exists"
        );
        assert_eq!(problem["status"], 409);
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_bad_request() {
        let app = create_app(AppState::default());

        let cases = [
            json!({"id": "b1", "title": "Rust", "url": "https://x.dev"}),
            json!({"id": "b1", "userId": "u1", "title": "", "url": "https://x.dev"}),
            json!({"id": "b1", "userId": "u1", "title": "Rust", "url": "not a url"}),
            json!({"id": "b1", "userId": "u1", "title": "Rust", "url": "https://x.dev", "tags": "one"}),
        ];

        for body in cases {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/bookmarks", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/bookmarks")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], 400);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(empty_request("GET", "/bookmarks/u1/missing"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["status"], 404);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let app = create_app(AppState::default());
        app.clone()
            .oneshot(json_request(
                "POST",
                "/bookmarks",
                &bookmark_json("u1", "b1", "Rust"),
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/bookmarks/u1/b1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("DELETE", "/bookmarks/u1/b1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_by_user() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/bookmarks/user/u1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: Vec<Value> = serde_json::from_value(body_json(response).await).unwrap();
        assert!(json.is_empty());

        for (user, id) in [("u1", "a"), ("u1", "b"), ("u2", "c")] {
            app.clone()
                .oneshot(json_request("POST", "/bookmarks", &bookmark_json(user, id, "T")))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(empty_request("GET", "/bookmarks/user/u1"))
            .await
            .unwrap();
        let json: Vec<Value> = serde_json::from_value(body_json(response).await).unwrap();
        let ids: Vec<&str> = json.iter().map(|b| b["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(json.iter().all(|b| b["etag"].is_string()));
    }

    #[tokio::test]
    async fn test_location_is_percent_encoded() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(json_request(
                "POST",
                "/bookmarks",
                &bookmark_json("jane doe", "b 1", "Rust"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/bookmarks/jane%20doe/b%201"
        );
    }
}
