use crate::helpers::test_app::TestApp;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{}/health", app.base_address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    assert_eq!("healthy".to_string(), response.text().await.unwrap());
}

#[tokio::test]
async fn categories_are_listed_in_order() {
    let app = TestApp::spawn_app().await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/categories", app.base_address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());
    let categories: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(!categories.is_empty());
    assert_eq!(categories[0]["name"], "食物");
    assert!(categories
        .iter()
        .all(|category| category["words"].as_u64().unwrap_or_default() > 0));
}
