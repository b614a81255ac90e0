//! WebSocket endpoint: upgrade, per-socket loop, and inbound dispatch.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use campus_auth::AuthenticatedActor;
use campus_core::error::AppError;
use campus_entity::ActorProfile;
use campus_realtime::connection::ConnectionHandle;
use campus_realtime::connection::heartbeat::run_heartbeat;
use campus_realtime::message::validator::validate_inbound;
use campus_realtime::message::{InboundMessage, OutboundMessage};
use campus_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: Option<String>,
}

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let token = query
        .token
        .ok_or_else(|| AppError::authentication("Missing token query parameter"))?;
    let identity = state.jwt_decoder.authenticate(&token)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, identity, socket)))
}

/// Drives one established socket until the peer leaves, the heartbeat
/// expires, the server evicts it, or the process shuts down.
async fn handle_socket(state: AppState, identity: AuthenticatedActor, socket: WebSocket) {
    let actor = identity.actor;
    if let Some(name) = identity.display_name.as_deref() {
        let profile = ActorProfile::new(actor, name);
        if let Err(e) = state.stores.directory.upsert(&profile).await {
            warn!(actor = %actor, error = %e, "Failed to record display name");
        }
    }

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut shutdown_rx = state.realtime.shutdown_receiver();
    let (handle, mut outbound_rx) = state.realtime.connections.register(actor);
    let conn_id = handle.id;
    let ctx = RequestContext::new(actor)
        .with_display_name(identity.display_name)
        .with_connection(conn_id);

    info!(conn_id = %conn_id, actor = %actor, "WebSocket connection established");

    let mut writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    let heartbeat = run_heartbeat(handle.clone(), state.realtime.connections.heartbeat_config());
    tokio::pin!(heartbeat);

    loop {
        tokio::select! {
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    dispatch(&state, &ctx, &handle, text.as_str()).await;
                }
                Some(Ok(Message::Pong(_))) => handle.record_pong().await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = &mut heartbeat => {
                debug!(conn_id = %conn_id, "Heartbeat ended");
                break;
            }
            _ = handle.closed() => {
                debug!(conn_id = %conn_id, "Connection closed by server");
                break;
            }
            _ = shutdown_rx.recv() => break,
            _ = &mut writer => break,
        }
    }

    state.realtime.connections.unregister(&conn_id);
    writer.abort();

    info!(conn_id = %conn_id, actor = %actor, "WebSocket connection closed");
}

/// Handles one inbound text frame. Failures are answered on the same
/// socket with an `error` frame; the socket stays open.
async fn dispatch(
    state: &AppState,
    ctx: &RequestContext,
    handle: &Arc<ConnectionHandle>,
    raw: &str,
) {
    state.realtime.metrics.frame_received();
    handle.record_pong().await;

    if let Err(e) = handle_frame(state, ctx, handle, raw).await {
        debug!(conn_id = %handle.id, error = %e, "Inbound frame rejected");
        state
            .realtime
            .hub
            .send_to_connection(&handle.id, &OutboundMessage::error(&e));
    }
}

async fn handle_frame(
    state: &AppState,
    ctx: &RequestContext,
    handle: &Arc<ConnectionHandle>,
    raw: &str,
) -> Result<(), AppError> {
    validate_inbound(raw)?;
    let frame: InboundMessage = serde_json::from_str(raw)
        .map_err(|e| AppError::validation(format!("Malformed frame: {e}")))?;

    match frame {
        InboundMessage::ActorOnline => {
            let snapshot = state.realtime.presence.snapshot();
            state
                .realtime
                .hub
                .send_to_connection(&handle.id, &OutboundMessage::presence(&snapshot));
        }
        InboundMessage::MessageSent {
            conversation_id,
            content,
            client_ref,
        } => {
            let message = state.messages.send(ctx, conversation_id, &content).await?;
            state.realtime.hub.send_to_connection(
                &handle.id,
                &OutboundMessage::MessageAccepted {
                    client_ref,
                    message,
                },
            );
        }
        InboundMessage::MarkRead { conversation_id } => {
            state.messages.mark_as_read(ctx, conversation_id).await?;
        }
        InboundMessage::Pong { .. } => {}
    }

    Ok(())
}
