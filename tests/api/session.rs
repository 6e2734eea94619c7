use std::time::Duration;

use tokio::time;
use tokio_tungstenite::tungstenite::Message;

use crate::helpers::test_app::TestApp;
use crate::helpers::test_screen::{ResultEntry, Word, WsMessageOut};

#[tokio::test]
async fn create_session_works() {
    let app = TestApp::spawn_app().await;

    let session_id = app.create_session().await;

    assert_eq!(session_id.len(), 5);
}

#[tokio::test]
async fn screen_of_unknown_session_receives_an_error() {
    let app = TestApp::spawn_app().await;

    let mut screen = app.open_screen("nope1").await.unwrap();

    assert_eq!(
        screen.receive_round().await.unwrap_err(),
        "SESSION_DOES_NOT_EXIST"
    );
}

#[tokio::test]
async fn second_screen_is_rejected() {
    let app = TestApp::spawn_app().await;
    let session_id = app.create_session().await;
    let mut first = app.open_screen(&session_id).await.unwrap();
    assert_eq!(first.receive_round().await.unwrap().stage, "Home");

    let mut second = app.open_screen(&session_id).await.unwrap();

    assert_eq!(
        second.receive_round().await.unwrap_err(),
        "SCREEN_ALREADY_CONNECTED"
    );
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen.send_message(Message::Text("ping".to_string())).await;

    assert_eq!(screen.receive_text().await, "pong");
}

#[tokio::test]
async fn marking_every_word_ends_the_round_early() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen.start_custom_round(&["a", "b", "c"], 30).await;
    let round = screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();
    assert_eq!(round.deck_size, 3);
    assert_eq!(round.label.as_deref(), Some("custom"));
    assert_eq!(
        round.word,
        Some(Word {
            primary: "a".to_string(),
            secondary: None
        })
    );

    screen.send(WsMessageOut::MarkCorrect).await;
    screen.send(WsMessageOut::MarkCorrect).await;
    screen.send(WsMessageOut::MarkSkip).await;
    let round = screen
        .receive_round_until(|round| round.stage == "Ended")
        .await
        .unwrap();

    assert_eq!(round.correct_count, 2);
    assert_eq!(round.skip_count, 1);
    assert_eq!(round.results.len(), 3);
    assert!(round.seconds_remaining > 0);
    assert_eq!(round.word, None);
}

#[tokio::test]
async fn custom_words_are_trimmed_and_blank_ones_dropped() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen.start_custom_round(&["  蛋撻 ", "   ", "菠蘿包"], 30).await;
    let round = screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();

    assert_eq!(round.deck_size, 2);
    assert_eq!(
        round.word,
        Some(Word {
            primary: "蛋撻".to_string(),
            secondary: None
        })
    );
}

#[tokio::test]
async fn double_press_skips_the_word() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;
    screen.start_custom_round(&["a", "b"], 30).await;
    screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();

    screen.send(WsMessageOut::Primary).await;
    screen.send(WsMessageOut::Secondary).await;
    let round = screen
        .receive_round_until(|round| round.current_index == 1)
        .await
        .unwrap();

    assert_eq!(round.skip_count, 1);
    assert_eq!(round.correct_count, 0);
    assert!(!round.awaiting_secondary);
}

#[tokio::test]
async fn single_press_marks_the_word_correct() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;
    screen.start_custom_round(&["a", "b"], 30).await;
    screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();

    screen.send(WsMessageOut::Primary).await;
    let round = screen
        .receive_round_until(|round| round.current_index == 1)
        .await
        .unwrap();

    assert_eq!(round.correct_count, 1);
    assert_eq!(round.skip_count, 0);
}

#[tokio::test]
async fn time_up_records_the_word_on_screen_as_missed() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen.start_round("食物", 1).await;
    let active = screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();
    let ended = screen
        .receive_round_until(|round| round.stage == "Ended")
        .await
        .unwrap();

    assert_eq!(
        ended.results,
        vec![ResultEntry {
            word: active.word.unwrap(),
            correct: false
        }]
    );
    assert_eq!(ended.current_index, 0);
    assert_eq!(ended.seconds_remaining, 0);
}

#[tokio::test]
async fn round_without_category_is_rejected() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen.start_round("", 30).await;

    assert_eq!(screen.receive_error().await, "INVALID_CONFIG");
}

#[tokio::test]
async fn go_home_abandons_the_round_and_restart_needs_an_ended_round() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;
    screen.start_custom_round(&["a", "b"], 30).await;
    screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();

    screen.send(WsMessageOut::Restart).await;
    assert_eq!(screen.receive_error().await, "INVALID_STAGE_FOR_RESTART");

    screen.send(WsMessageOut::GoHome).await;
    let round = screen
        .receive_round_until(|round| round.stage == "Home")
        .await
        .unwrap();
    assert_eq!(round.deck_size, 0);
    assert!(round.results.is_empty());
}

#[tokio::test]
async fn late_marks_are_not_reported_to_the_screen() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen.send(WsMessageOut::MarkCorrect).await;
    screen.send(WsMessageOut::Secondary).await;
    screen.send_message(Message::Text("ping".to_string())).await;

    assert_eq!(screen.receive_text().await, "pong");
}

#[tokio::test]
async fn unknown_message_is_unprocessable() {
    let (_app, mut screen) = TestApp::spawn_app_with_screen().await;

    screen
        .send_message(Message::Text(r#"{"kind": "jump"}"#.to_string()))
        .await;

    assert_eq!(screen.receive_error().await, "UNPROCESSABLE_MESSAGE");
}

#[tokio::test]
async fn screen_can_reconnect_to_a_running_round() {
    let app = TestApp::spawn_app().await;
    let session_id = app.create_session().await;
    let mut screen = app.open_screen(&session_id).await.unwrap();
    screen.receive_round().await.unwrap();
    screen.start_custom_round(&["a", "b"], 30).await;
    screen
        .receive_round_until(|round| round.stage == "Active")
        .await
        .unwrap();

    drop(screen);
    time::sleep(Duration::from_millis(200)).await;
    let mut screen = app.open_screen(&session_id).await.unwrap();

    assert_eq!(screen.receive_round().await.unwrap().stage, "Active");
}
