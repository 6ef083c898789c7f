use super::*;
use crate::backend::RequestBody;
use crate::routes::app;
use crate::state::test_helpers::*;
use tower::ServiceExt;

// =============================================================================
// GET /api/books
// =============================================================================

#[tokio::test]
async fn books_are_normalized() {
    let backend = MockBackend::new(vec![MockReply::json(
        200,
        json!([
            { "id": 5, "title": null },
            { "id": "7", "title": "Ficciones", "author": "Borges", "description": "Cuentos", "year": 1944 },
        ]),
    )]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books", None)).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": "5", "title": "", "author": "", "description": "" },
            { "id": "7", "title": "Ficciones", "author": "Borges", "description": "Cuentos" },
        ])
    );
    assert_eq!(backend.calls()[0].path, "/books");
    assert!(backend.calls()[0].bearer.is_none());
}

#[tokio::test]
async fn books_without_id_are_filtered() {
    let backend = MockBackend::new(vec![MockReply::json(200, json!([{ "title": "orphan" }, { "id": 1 }]))]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books", None)).await.unwrap();
    let (_, body) = response_json(resp).await;
    assert_eq!(body, json!([{ "id": "1", "title": "", "author": "", "description": "" }]));
}

#[tokio::test]
async fn books_backend_error_forwards_status() {
    let backend = MockBackend::new(vec![MockReply::json(503, json!({ "detail": "db down" }))]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books", None)).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["where"], json!("backend_error"));
    assert_eq!(body["detail"], json!("db down"));
    assert_eq!(body["called"], json!("http://backend.test/books"));
}

#[tokio::test]
async fn books_non_array_is_bad_gateway() {
    let backend = MockBackend::new(vec![MockReply::json(200, json!({ "items": [] }))]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books", None)).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["where"], json!("invalid_books_format"));
    assert_eq!(body["backendResponse"], json!({ "items": [] }));
}

#[tokio::test]
async fn books_backend_down_is_500() {
    let backend = MockBackend::new(vec![MockReply::unreachable()]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// GET /api/books/:id/reviews
// =============================================================================

#[tokio::test]
async fn reviews_are_public_pass_through() {
    let reviews = json!([{ "username": "ana", "text": "Great", "rating": 5 }]);
    let backend = MockBackend::new(vec![MockReply::json(200, reviews.clone())]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books/42/reviews", None)).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, reviews);
    assert_eq!(backend.calls()[0].path, "/books/42/reviews");
}

#[tokio::test]
async fn reviews_empty_body_becomes_empty_list() {
    let backend = MockBackend::new(vec![MockReply::text(200, "")]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books/42/reviews", None)).await.unwrap();
    let (_, body) = response_json(resp).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn reviews_backend_404_forwards_detail() {
    let backend = MockBackend::new(vec![MockReply::json(404, json!({ "detail": "Book not found" }))]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books/99/reviews", None)).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], json!("Book not found"));
    assert_eq!(body["bookId"], json!("99"));
    assert_eq!(body["called"], json!("http://backend.test/books/99/reviews"));
}

#[tokio::test]
async fn reviews_blank_book_id_is_400() {
    let backend = MockBackend::new(vec![]);
    let resp = app(test_app_state(&backend)).oneshot(get_request("/api/books/%20/reviews", None)).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["where"], json!("missing_book_id_in_url"));
    assert_eq!(backend.call_count(), 0);
}

// =============================================================================
// POST /api/books/:id/reviews
// =============================================================================

#[tokio::test]
async fn review_rating_out_of_range_rejected_locally() {
    let backend = MockBackend::new(vec![]);
    let req = post_request("/api/books/42/reviews", r#"{"text":"Loved it","rating":6}"#, Some("T"));
    let resp = app(test_app_state(&backend)).oneshot(req).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["where"], json!("invalid_payload"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn review_without_session_is_401() {
    let backend = MockBackend::new(vec![]);
    let req = post_request("/api/books/42/reviews", r#"{"text":"Loved it","rating":5}"#, None);
    let resp = app(test_app_state(&backend)).oneshot(req).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["where"], json!("not_authenticated"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn review_without_text_is_400() {
    let backend = MockBackend::new(vec![]);
    let req = post_request("/api/books/42/reviews", r#"{"rating":3}"#, Some("T"));
    let resp = app(test_app_state(&backend)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn review_forwarded_with_bearer() {
    let backend = MockBackend::new(vec![MockReply::json(201, json!({ "id": 3, "text": "Loved it" }))]);
    let req = post_request("/api/books/42/reviews", r#"{"text":" Loved it ","username":"ana","rating":"4"}"#, Some("T"));
    let resp = app(test_app_state(&backend)).oneshot(req).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "id": 3, "text": "Loved it" }));

    let calls = backend.calls();
    assert_eq!(calls[0].path, "/books/42/reviews");
    assert_eq!(calls[0].bearer.as_deref(), Some("T"));
    assert_eq!(calls[0].body, RequestBody::Json(json!({ "username": "ana", "text": "Loved it", "rating": 4 })));
}

#[tokio::test]
async fn review_backend_rejection_echoes_payload() {
    let backend = MockBackend::new(vec![MockReply::json(401, json!({ "detail": "Token expired" }))]);
    let req = post_request("/api/books/42/reviews", r#"{"text":"Loved it"}"#, Some("T"));
    let resp = app(test_app_state(&backend)).oneshot(req).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], json!("Token expired"));
    assert_eq!(body["sentPayload"], json!({ "username": "Anon", "text": "Loved it" }));
}

#[tokio::test]
async fn review_empty_success_body_reports_ok() {
    let backend = MockBackend::new(vec![MockReply::text(201, "")]);
    let req = post_request("/api/libros/42/resenas", r#"{"text":"Loved it"}"#, Some("T"));
    let resp = app(test_app_state(&backend)).oneshot(req).await.unwrap();

    let (status, body) = response_json(resp).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "ok": true }));
}
