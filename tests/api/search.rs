use dinescore::dal::seed;
use serde_json::{json, Value};

use crate::helpers::{model_answer, provider_failure, spawn_app};

#[tokio::test]
async fn search_on_empty_store_returns_empty_matches() {
    let app = spawn_app(vec![]).await;

    let response = app
        .post_search(&json!({"query": "めちゃくちゃおしゃれで雰囲気のいいカフェを探している"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["matches"], json!([]));
    assert_eq!(body["low_confidence"], json!(false));
    assert_eq!(app.gemini.calls(), 0);
}

#[tokio::test]
async fn atmosphere_search_ranks_seeded_restaurants() {
    let app = spawn_app(vec![model_answer(
        r#"{"criteria": {"taste": null, "cleanliness": null, "price": null, "atmosphere": 5}, "keywords": []}"#,
    )])
    .await;
    seed::seed_mock_restaurants(&app.db_pool).await.unwrap();

    let response = app
        .post_search(&json!({"query": "雰囲気のいいお店"}))
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["matches"][0]["store_name"], "吉利");
    assert_eq!(body["matches"][0]["score"], json!(1.0));
    assert_eq!(body["criteria"]["importance"]["atmosphere"], json!(5));
    assert_eq!(app.gemini.calls(), 1);
}

#[tokio::test]
async fn search_accepts_get_with_a_json_body() {
    let app = spawn_app(vec![]).await;

    let response = app
        .client
        .get(format!("{}/api/search", app.address))
        .json(&json!({"query": "ramen"}))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn search_rejects_invalid_bodies() {
    let app = spawn_app(vec![]).await;

    for (body, description) in [
        (json!({"query": "   "}), "blank query"),
        (json!({}), "missing query"),
        (json!({"query": 42}), "non-string query"),
    ] {
        let response = app.post_search(&body).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "did not fail with 400 for {}",
            description
        );
    }
    assert_eq!(app.gemini.calls(), 0);
}

#[tokio::test]
async fn provider_failures_become_bad_gateway() {
    let app = spawn_app(vec![provider_failure(500, "upstream exploded")]).await;
    seed::seed_mock_restaurants(&app.db_pool).await.unwrap();

    let response = app.post_search(&json!({"query": "安い"})).await;

    assert_eq!(502, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn store_failures_hide_database_details() {
    let app = spawn_app(vec![]).await;
    sqlx::query("drop table restaurants")
        .execute(&app.db_pool)
        .await
        .unwrap();

    let response = app.post_search(&json!({"query": "ramen"})).await;

    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!("Failed to read restaurants"));
    assert_eq!(app.gemini.calls(), 0);
}
