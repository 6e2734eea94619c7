use std::time::Duration;

use serde::Deserialize;
use tokio::time;

use crate::helpers::test_app::TestApp;

#[derive(Deserialize, Debug, PartialEq)]
struct CategoryUsage {
    category: String,
    count: u64,
}

async fn leaderboard(app: &TestApp) -> Vec<CategoryUsage> {
    let response = reqwest::Client::new()
        .get(format!("http://{}/admin/leaderboard", app.base_address))
        .send()
        .await
        .expect("Failed to execute Leaderboard request.");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse the leaderboard.")
}

#[tokio::test]
async fn leaderboard_starts_empty() {
    let app = TestApp::spawn_app().await;

    assert!(leaderboard(&app).await.is_empty());
}

#[tokio::test]
async fn started_category_rounds_are_counted() {
    let (app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen.start_round("動物", 30).await;
    screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();

    // The counter is written in the background
    let mut usages = leaderboard(&app).await;
    for _ in 0..20 {
        if !usages.is_empty() {
            break;
        }
        time::sleep(Duration::from_millis(50)).await;
        usages = leaderboard(&app).await;
    }

    assert_eq!(
        usages,
        vec![CategoryUsage {
            category: "動物".to_string(),
            count: 1
        }]
    );
}
