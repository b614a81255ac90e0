//! Live WebSocket round trips against a server bound to a local port.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use campus_api::AppState;
use campus_core::Actor;
use campus_core::config::AppConfig;
use campus_database::Stores;

use helpers::TestApp;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn spawn_server(app: &TestApp) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server error");
    });
    addr
}

async fn connect(addr: SocketAddr, token: &str) -> Socket {
    let (socket, _) = connect_async(format!("ws://{addr}/ws?token={token}"))
        .await
        .expect("Failed to connect");
    socket
}

/// Next JSON frame whose `type` equals `kind`, skipping any others.
async fn next_of_type(socket: &mut Socket, kind: &str) -> Value {
    timeout(WAIT, async {
        loop {
            let frame = socket
                .next()
                .await
                .expect("socket ended")
                .expect("socket error");
            if let Message::Text(text) = frame {
                let value: Value = serde_json::from_str(text.as_str()).expect("json frame");
                if value["type"] == kind {
                    return value;
                }
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {kind}"))
}

async fn send_frame(socket: &mut Socket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .expect("Failed to send frame");
}

fn online(frame: &Value) -> Vec<Actor> {
    serde_json::from_value(frame["online"].clone()).expect("online list")
}

#[tokio::test]
async fn test_upgrade_requires_a_valid_token() {
    let app = TestApp::new();
    let addr = spawn_server(&app).await;

    assert!(connect_async(format!("ws://{addr}/ws")).await.is_err());
    assert!(
        connect_async(format!("ws://{addr}/ws?token=garbage"))
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_presence_delivery_and_read_receipts() {
    let app = TestApp::new();
    let addr = spawn_server(&app).await;
    let student = Actor::primary(1);
    let operator = Actor::operator(9);
    let student_token = app.token(student);
    let operator_token = app.token(operator);

    let mut student_ws = connect(addr, &student_token).await;
    let first = next_of_type(&mut student_ws, "presence_changed").await;
    assert_eq!(online(&first), vec![student]);
    let first_version = first["version"].as_u64().expect("version");

    let mut operator_ws = connect(addr, &operator_token).await;
    let seen_by_operator = next_of_type(&mut operator_ws, "presence_changed").await;
    assert_eq!(online(&seen_by_operator), vec![student, operator]);
    let seen_by_student = next_of_type(&mut student_ws, "presence_changed").await;
    assert_eq!(online(&seen_by_student), vec![student, operator]);
    assert!(seen_by_student["version"].as_u64().expect("version") > first_version);

    let conversation_id = app.open_conversation(&student_token, operator).await;

    send_frame(
        &mut student_ws,
        json!({
            "type": "message_sent",
            "conversation_id": conversation_id,
            "content": "hello",
            "client_ref": "c-1",
        }),
    )
    .await;

    let accepted = next_of_type(&mut student_ws, "message_accepted").await;
    assert_eq!(accepted["client_ref"], "c-1");
    assert_eq!(accepted["message"]["content"], "hello");

    let received = next_of_type(&mut operator_ws, "message_received").await;
    assert_eq!(received["message"]["id"], accepted["message"]["id"]);
    assert_eq!(received["message"]["conversation_id"], conversation_id);

    send_frame(
        &mut operator_ws,
        json!({ "type": "mark_read", "conversation_id": conversation_id }),
    )
    .await;
    for socket in [&mut student_ws, &mut operator_ws] {
        let receipt = next_of_type(socket, "messages_read").await;
        assert_eq!(receipt["conversation_id"], conversation_id);
        assert_eq!(receipt["updated_count"], 1);
        assert_eq!(receipt["reader"], json!({ "kind": "operator", "id": 9 }));
    }

    operator_ws.close(None).await.expect("close");
    let after_leave = next_of_type(&mut student_ws, "presence_changed").await;
    assert_eq!(online(&after_leave), vec![student]);
    assert!(
        after_leave["version"].as_u64().expect("version")
            > seen_by_student["version"].as_u64().expect("version")
    );
}

#[tokio::test]
async fn test_http_send_reaches_live_sockets() {
    let app = TestApp::new();
    let addr = spawn_server(&app).await;
    let student = Actor::primary(2);
    let operator = Actor::operator(3);
    let student_token = app.token(student);

    let mut operator_ws = connect(addr, &app.token(operator)).await;
    next_of_type(&mut operator_ws, "presence_changed").await;

    let conversation_id = app.open_conversation(&student_token, operator).await;
    let stored = app.send(&student_token, conversation_id, "over http").await;

    let received = next_of_type(&mut operator_ws, "message_received").await;
    assert_eq!(received["message"], stored);
}

#[tokio::test]
async fn test_bad_frames_get_error_replies_and_socket_stays_open() {
    let app = TestApp::new();
    let addr = spawn_server(&app).await;
    let outsider = Actor::primary(3);
    let conversation_id = app
        .open_conversation(&app.token(Actor::primary(1)), Actor::operator(9))
        .await;

    let mut ws = connect(addr, &app.token(outsider)).await;
    next_of_type(&mut ws, "presence_changed").await;

    ws.send(Message::Text("not json".into()))
        .await
        .expect("send");
    let error = next_of_type(&mut ws, "error").await;
    assert_eq!(error["code"], "VALIDATION");

    send_frame(
        &mut ws,
        json!({
            "type": "message_sent",
            "conversation_id": conversation_id,
            "content": "let me in",
        }),
    )
    .await;
    let error = next_of_type(&mut ws, "error").await;
    assert_eq!(error["code"], "AUTHORIZATION");

    send_frame(&mut ws, json!({ "type": "actor_online" })).await;
    let snapshot = next_of_type(&mut ws, "presence_changed").await;
    assert_eq!(online(&snapshot), vec![outsider]);
}

#[tokio::test]
async fn test_second_socket_does_not_change_presence() {
    let app = TestApp::new();
    let addr = spawn_server(&app).await;
    let operator = Actor::operator(4);
    let token = app.token(operator);

    let mut first = connect(addr, &token).await;
    let initial = next_of_type(&mut first, "presence_changed").await;

    let mut second = connect(addr, &token).await;
    let second_snapshot = next_of_type(&mut second, "presence_changed").await;
    assert_eq!(second_snapshot["version"], initial["version"]);
    assert_eq!(online(&second_snapshot), vec![operator]);

    // Dropping one of two sockets leaves the actor online.
    second.close(None).await.expect("close");
    timeout(WAIT, async {
        while app.state.realtime.connections.connection_count() > 1 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("second socket unregistered");
    assert!(app.state.realtime.presence.is_online(&operator));
}

#[tokio::test]
async fn test_presence_entries_count_connections() {
    let app = TestApp::new();
    let addr = spawn_server(&app).await;
    let operator = Actor::operator(5);
    let token = app.token(operator);

    let mut first = connect(addr, &token).await;
    next_of_type(&mut first, "presence_changed").await;
    let mut second = connect(addr, &token).await;
    next_of_type(&mut second, "presence_changed").await;

    let response = app
        .request("GET", "/api/presence/entries", None, Some(&token))
        .await;
    assert_eq!(response.status, 200);
    let entries = response.body["data"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["actor"], json!(operator));
    assert_eq!(entries[0]["connections"], 2);
    assert!(entries[0]["connected_since"].is_string());
}

#[tokio::test]
async fn test_any_inbound_frame_keeps_socket_alive() {
    let mut config = AppConfig::in_memory();
    config.realtime.ping_interval_seconds = 1;
    config.realtime.ping_timeout_seconds = 1;
    let app = TestApp::with_config(config);
    let addr = spawn_server(&app).await;
    let chatty = Actor::primary(6);
    let silent = Actor::operator(8);

    let mut chatty_ws = connect(addr, &app.token(chatty)).await;
    next_of_type(&mut chatty_ws, "presence_changed").await;
    let mut silent_ws = connect(addr, &app.token(silent)).await;
    next_of_type(&mut silent_ws, "presence_changed").await;

    // Neither client answers pings; only one keeps sending frames.
    for _ in 0..12 {
        send_frame(&mut chatty_ws, json!({ "type": "actor_online" })).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    assert!(app.state.realtime.presence.is_online(&chatty));
    assert!(!app.state.realtime.presence.is_online(&silent));
    assert_eq!(app.state.realtime.connections.connection_count(), 1);
}

#[tokio::test]
async fn test_graceful_shutdown_closes_sockets() {
    let config = AppConfig::in_memory();
    let app = TestApp::with_config(config.clone());
    let state = AppState::new(config, Stores::memory());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(campus_api::serve(listener, state, async move {
        let _ = stop_rx.await;
    }));

    let mut ws = connect(addr, &app.token(Actor::primary(1))).await;
    next_of_type(&mut ws, "presence_changed").await;

    stop_tx.send(()).expect("stop signal");

    let ended = timeout(WAIT, async {
        loop {
            match ws.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "socket stayed open after shutdown");

    let result = timeout(WAIT, server)
        .await
        .expect("server did not stop")
        .expect("server task panicked");
    assert!(result.is_ok());
}
