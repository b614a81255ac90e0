//! HTTP integration tests for conversations, messages and read state.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use campus_core::Actor;
use campus_entity::Message;

use helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let response = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["store_provider"], "memory");
    assert_eq!(response.body["data"]["store"], "connected");
    assert_eq!(response.body["data"]["ws_connections"], 0);
}

#[tokio::test]
async fn test_requests_without_valid_token_are_rejected() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/conversations", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTHENTICATION");

    let response = app
        .request("GET", "/api/conversations", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_operator_inbox_scenario() {
    let app = TestApp::new();
    let student = Actor::primary(1);
    let operator = Actor::operator(9);
    let student_token = app.token(student);
    let operator_token = app.token(operator);
    app.seed_profile(student, "Ada Student").await;

    let conversation_id = app.open_conversation(&student_token, operator).await;
    let message = app.send(&student_token, conversation_id, "hi").await;
    assert_eq!(message["content"], "hi");
    assert_eq!(message["is_read"], false);

    let response = app
        .request("GET", "/api/conversations", None, Some(&operator_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let list = response.body["data"].as_array().expect("list");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], conversation_id);
    assert_eq!(list[0]["peer"]["display_name"], "Ada Student");
    assert_eq!(list[0]["peer"]["kind"], "primary");
    assert_eq!(list[0]["peer_online"], false);
    assert_eq!(list[0]["unread_count"], 1);
    assert_eq!(list[0]["last_message"]["content"], "hi");

    let path = format!("/api/conversations/{conversation_id}/read");
    let response = app.request("POST", &path, None, Some(&operator_token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["updated_count"], 1);

    let response = app.request("POST", &path, None, Some(&operator_token)).await;
    assert_eq!(response.body["data"]["updated_count"], 0);

    let response = app
        .request(
            "GET",
            &format!("/api/conversations/{conversation_id}/unread"),
            None,
            Some(&operator_token),
        )
        .await;
    assert_eq!(response.body["data"]["count"], 0);

    // The sender's own view never counted its message as unread.
    let response = app
        .request("GET", "/api/conversations", None, Some(&student_token))
        .await;
    assert_eq!(response.body["data"][0]["unread_count"], 0);
    assert_eq!(response.body["data"][0]["last_message"]["is_read"], true);
}

#[tokio::test]
async fn test_primary_pair_is_rejected_without_side_effects() {
    let app = TestApp::new();
    let token = app.token(Actor::primary(1));

    let response = app
        .request(
            "POST",
            "/api/conversations",
            Some(json!({ "peer": Actor::primary(2) })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_code(), "INVALID_PAIRING");

    let response = app.request("GET", "/api/conversations", None, Some(&token)).await;
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_self_pair_is_a_validation_error() {
    let app = TestApp::new();
    let operator = Actor::operator(4);
    let token = app.token(operator);

    let response = app
        .request(
            "POST",
            "/api/conversations",
            Some(json!({ "peer": operator })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_open_conversation_is_idempotent_in_either_direction() {
    let app = TestApp::new();
    let student = Actor::primary(5);
    let operator = Actor::operator(2);

    let first = app.open_conversation(&app.token(student), operator).await;
    let again = app.open_conversation(&app.token(student), operator).await;
    let reversed = app.open_conversation(&app.token(operator), student).await;

    assert_eq!(first, again);
    assert_eq!(first, reversed);
}

#[tokio::test]
async fn test_operator_pair_is_permitted() {
    let app = TestApp::new();
    let token = app.token(Actor::operator(1));

    let id = app.open_conversation(&token, Actor::operator(2)).await;
    let response = app
        .request("GET", &format!("/api/conversations/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["participants"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_conversation_access_rules() {
    let app = TestApp::new();
    let student = Actor::primary(1);
    let operator = Actor::operator(9);
    let conversation_id = app.open_conversation(&app.token(student), operator).await;
    let path = format!("/api/conversations/{conversation_id}/messages");

    // Another primary is not a participant.
    let response = app
        .request("GET", &path, None, Some(&app.token(Actor::primary(3))))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "AUTHORIZATION");

    // Any operator shares the inbox of operator-involving conversations.
    let response = app
        .request("GET", &path, None, Some(&app.token(Actor::operator(10))))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "GET",
            "/api/conversations/999999/messages",
            None,
            Some(&app.token(student)),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_send_rejects_blank_and_oversized_content() {
    let mut config = campus_core::config::AppConfig::in_memory();
    config.messaging.max_content_length = 10;
    let app = TestApp::with_config(config);
    let token = app.token(Actor::primary(1));
    let conversation_id = app.open_conversation(&token, Actor::operator(2)).await;
    let path = format!("/api/conversations/{conversation_id}/messages");

    for content in ["", "   \n", "this is far too long"] {
        let response = app
            .request("POST", &path, Some(json!({ "content": content })), Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "content {content:?}");
        assert_eq!(response.error_code(), "VALIDATION");
    }

    let response = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_history_is_strictly_ordered() {
    let app = TestApp::new();
    let student = Actor::primary(1);
    let operator = Actor::operator(2);
    let student_token = app.token(student);
    let operator_token = app.token(operator);
    let conversation_id = app.open_conversation(&student_token, operator).await;

    app.send(&student_token, conversation_id, "one").await;
    app.send(&operator_token, conversation_id, "two").await;
    app.send(&student_token, conversation_id, "three").await;

    let response = app
        .request(
            "GET",
            &format!("/api/conversations/{conversation_id}/messages"),
            None,
            Some(&operator_token),
        )
        .await;
    let history: Vec<Message> =
        serde_json::from_value(response.body["data"].clone()).expect("messages");

    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["one", "two", "three"]);
    for pair in history.windows(2) {
        assert!(pair[0].id < pair[1].id);
        assert!(pair[0].timestamp < pair[1].timestamp);
    }

    // The conversation's activity time follows its newest message.
    let response = app
        .request("GET", "/api/conversations", None, Some(&student_token))
        .await;
    assert_eq!(response.body["data"][0]["unread_count"], 1);
    assert_eq!(
        response.body["data"][0]["last_message_at"],
        serde_json::to_value(history[2].timestamp).expect("timestamp")
    );
}

#[tokio::test]
async fn test_conversation_detail_uses_directory_names() {
    let app = TestApp::new();
    let student = Actor::primary(1);
    let operator = Actor::operator(9);
    app.seed_profile(operator, "Help Desk").await;
    let token = app.token(student);
    let conversation_id = app.open_conversation(&token, operator).await;

    let response = app
        .request(
            "GET",
            &format!("/api/conversations/{conversation_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let participants = &response.body["data"]["participants"];
    // Unknown actors fall back to a placeholder name.
    assert_eq!(participants[0]["display_name"], "primary#1");
    assert_eq!(participants[1]["display_name"], "Help Desk");
}

#[tokio::test]
async fn test_actor_directory_filters_by_kind() {
    let app = TestApp::new();
    app.seed_profile(Actor::primary(1), "Ada").await;
    app.seed_profile(Actor::operator(2), "Desk A").await;
    app.seed_profile(Actor::operator(3), "Desk B").await;
    let token = app.token(Actor::primary(1));

    let response = app
        .request("GET", "/api/actors?kind=operator", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response.body["data"]
        .as_array()
        .expect("list")
        .iter()
        .filter_map(|p| p["display_name"].as_str())
        .collect();
    assert_eq!(names, ["Desk A", "Desk B"]);

    let response = app.request("GET", "/api/actors", None, Some(&token)).await;
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_presence_is_empty_without_sockets() {
    let app = TestApp::new();
    let token = app.token(Actor::primary(1));

    let response = app
        .request("GET", "/api/presence/online", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["online"], json!([]));
}
