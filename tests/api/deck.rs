use serde_json::{json, Value};

use crate::helpers::test_app::TestApp;

async fn save_deck(app: &TestApp, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{}/decks", app.base_address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute SaveDeck request.")
}

#[tokio::test]
async fn custom_deck_is_saved_and_can_be_overwritten() {
    let app = TestApp::spawn_app().await;

    let response = save_deck(
        &app,
        json!({"words": ["蛋撻", "菠蘿包"], "maxItemsPerPerson": 5, "totalPeople": 2}),
    )
    .await;
    assert!(response.status().is_success());
    let id = response.json::<Value>().await.unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!id.is_empty());

    let response = save_deck(
        &app,
        json!({"id": id, "words": ["蛋撻", "菠蘿包", "魚蛋"], "maxItemsPerPerson": 5, "totalPeople": 2}),
    )
    .await;
    assert!(response.status().is_success());
    assert_eq!(response.json::<Value>().await.unwrap()["id"], id);
}

#[tokio::test]
async fn deck_with_a_single_word_is_rejected() {
    let app = TestApp::spawn_app().await;

    let response = save_deck(
        &app,
        json!({"words": ["蛋撻", "  "], "maxItemsPerPerson": 5, "totalPeople": 2}),
    )
    .await;

    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>().await.unwrap()["type"], "INVALID_DECK");
}

#[tokio::test]
async fn deck_over_its_limit_is_rejected() {
    let app = TestApp::spawn_app().await;

    let response = save_deck(
        &app,
        json!({"words": ["a", "b", "c"], "maxItemsPerPerson": 1, "totalPeople": 2}),
    )
    .await;

    assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn deck_that_cannot_be_written_is_unavailable() {
    let directory = tempfile::tempdir().unwrap();
    let store_path = directory.path().join("missing").join("store.json");
    let app = TestApp::spawn_app_with_store(Some(store_path.to_str().unwrap().to_string())).await;

    let response = save_deck(
        &app,
        json!({"words": ["蛋撻", "菠蘿包"], "maxItemsPerPerson": 5, "totalPeople": 2}),
    )
    .await;

    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>().await.unwrap()["type"],
        "PERSISTENCE_FAILURE"
    );
}
