use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use article_recommender::api::{create_router, AppState};
use article_recommender::db::MemoryStore;
use article_recommender::models::{Article, ClickEvent, SizeCategory, Tables, User};

fn article(article_id: i64, words_count: i64, cluster_id: i64, size: SizeCategory) -> Article {
    Article {
        article_id,
        words_count,
        cluster_id,
        size_category: size,
    }
}

/// Popular order: 1, 2, 3, 4, 5. User 10 never clicked; user 11 read a
/// popular article; user 12 read a niche one; user 13 read two clusters.
fn seed() -> Tables {
    let mut clicks = Vec::new();
    for (article_id, times) in [(1, 9), (2, 8), (3, 7), (4, 6), (5, 5)] {
        for n in 0..times {
            clicks.push(ClickEvent::new(100 + n, article_id));
        }
    }
    clicks.push(ClickEvent::new(11, 3));
    clicks.push(ClickEvent::new(12, 20));
    clicks.extend([
        ClickEvent::new(13, 20),
        ClickEvent::new(13, 21),
        ClickEvent::new(13, 30),
    ]);

    use SizeCategory::*;
    let articles = vec![
        article(1, 200, 0, Medium),
        article(2, 210, 0, Medium),
        article(3, 220, 0, Medium),
        article(4, 230, 0, Medium),
        article(5, 240, 0, Medium),
        article(20, 90, 2, Small),
        article(21, 95, 2, Small),
        article(22, 400, 2, Long),
        article(23, 80, 2, Small),
        article(24, 85, 2, Small),
        article(30, 410, 3, Long),
        article(31, 420, 3, Long),
    ];

    let users = (0..=13).map(|user_id| User { user_id }).collect();

    Tables {
        clicks,
        articles,
        users,
    }
}

fn create_test_server() -> TestServer {
    let store = Arc::new(MemoryStore::with_tables(seed()));
    let app = create_router(AppState::new(store, 5));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_no_action_returns_welcome() {
    let server = create_test_server();
    let response = server.get("/api/recommender").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("Welcome"));
}

#[tokio::test]
async fn test_unknown_action_is_bad_request() {
    let server = create_test_server();
    let response = server
        .get("/api/recommender")
        .add_query_param("action", "drop_tables")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_new_user_gets_popular() {
    let server = create_test_server();
    let response = server
        .get("/api/recommender")
        .add_query_param("action", "recommend")
        .add_query_param("user_id", 10)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["strategy"], 1);
    assert_eq!(body["recommendations"], json!([1, 2, 3, 4, 5]));
}

#[tokio::test]
async fn test_recommend_each_strategy() {
    let server = create_test_server();

    let cases = [
        (11, 2, json!([1, 2, 4, 5])),
        // small cluster 2 articles, then the cluster backfill
        (12, 3, json!([21, 23, 24, 21, 22])),
        // cluster 2 (two clicks) alone fills the list before cluster 3
        (13, 5, json!([23, 24, 22, 23, 24])),
    ];

    for (user_id, strategy, expected) in cases {
        let response = server
            .get(&format!("/api/v1/users/{}/recommendations", user_id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["strategy"], strategy, "user {}", user_id);
        assert_eq!(body["recommendations"], expected, "user {}", user_id);
    }
}

#[tokio::test]
async fn test_recommend_is_repeatable() {
    let server = create_test_server();
    let first: Value = server.get("/api/v1/users/13/recommendations").await.json();
    let second: Value = server.get("/api/v1/users/13/recommendations").await.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_recommend_missing_user_id() {
    let server = create_test_server();
    let response = server
        .get("/api/recommender")
        .add_query_param("action", "recommend")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_non_numeric_user_id() {
    let server = create_test_server();
    let response = server.get("/api/v1/users/abc/recommendations").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_unknown_user_is_not_found() {
    let server = create_test_server();
    let response = server
        .get("/api/recommender")
        .add_query_param("action", "recommend")
        .add_query_param("user_id", 5000)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("13"));
}

#[tokio::test]
async fn test_add_user_then_recommend() {
    let server = create_test_server();

    let response = server
        .get("/api/recommender")
        .add_query_param("action", "add_user")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["user_id"], 14);

    let response = server.post("/api/v1/users").await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user_id"], 15);

    let response = server.get("/api/v1/users/15/recommendations").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["strategy"], 1);
}

#[tokio::test]
async fn test_add_article_via_action() {
    let server = create_test_server();
    let response = server
        .get("/api/recommender")
        .add_query_param("action", "add_article")
        .add_query_param("words_count", 1500)
        .add_query_param("cluster_choice", 3)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["article_id"], 32);
    assert_eq!(body["size_category"], "long");
    assert_eq!(body["cluster_id"], 3);

    let datasets: Value = server.get("/api/v1/datasets").await.json();
    let articles = datasets["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 13);
    assert_eq!(articles[12]["article_id"], 32);
}

#[tokio::test]
async fn test_add_article_rejects_bad_parameters() {
    let server = create_test_server();

    let response = server
        .get("/api/recommender")
        .add_query_param("action", "add_article")
        .add_query_param("words_count", "many")
        .add_query_param("cluster_choice", 3)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/api/recommender")
        .add_query_param("action", "add_article")
        .add_query_param("words_count", 100)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/articles")
        .json(&json!({ "words_count": -10, "cluster_id": 1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_article_malformed_body_is_bad_request() {
    let server = create_test_server();

    for body in [
        json!({ "words_count": "many", "cluster_id": 1 }),
        json!({ "cluster_id": 1 }),
    ] {
        let response = server.post("/api/v1/articles").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert!(error["error"].as_str().unwrap().contains("invalid article body"));
    }

    let datasets: Value = server.get("/api/v1/datasets").await.json();
    assert_eq!(datasets["articles"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_create_article_rest() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/articles")
        .json(&json!({ "words_count": 10, "cluster_id": 2 }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["article_id"], 32);
    assert_eq!(body["size_category"], "small");
}

#[tokio::test]
async fn test_load_datasets_and_reload() {
    let server = create_test_server();

    let response = server
        .get("/api/recommender")
        .add_query_param("action", "load_datasets")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 14);
    assert!(body["loaded_at"].is_string());

    let response = server.post("/api/v1/datasets/reload").await;
    response.assert_status_ok();
    let summary: Value = response.json();
    assert_eq!(summary["articles"], 12);
    assert_eq!(summary["users"], 14);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f9619ff-8b86-4d11-b42d-00c04fc964ff";
    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}
