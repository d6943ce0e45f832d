//! WebSocket handler
//!
//! Each connection runs three tasks: a reader that feeds frames to the op
//! handlers, a writer that drains the connection's outbound queue, and a
//! watchdog that enforces the identify and heartbeat deadlines. The first
//! one to finish ends the connection.

use crate::connection::{Connection, ConnectionState, Outbound};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

/// How often the watchdog checks deadlines
const WATCHDOG_TICK: Duration = Duration::from_secs(1);

/// How long the writer gets to flush a close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = Connection::generate_session_id();
    let (tx, mut rx) = mpsc::channel::<Outbound>(MESSAGE_BUFFER_SIZE);

    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    let hello = GatewayMessage::hello(HelloPayload::with_interval(state.heartbeat_interval_ms()));
    if let Ok(json) = hello.to_json() {
        if ws_sink.send(Message::Text(json)).await.is_err() {
            tracing::warn!(session_id = %session_id, "Failed to send Hello message");
            cleanup_connection(&state, &session_id, &connection).await;
            return;
        }
    }

    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) =
                        handle_text_message(&state_recv, &connection_recv, &text).await
                    {
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(session_id = %session_id_recv, "Binary messages not supported");
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id_recv, error = %e, "WebSocket error");
                    return None;
                }
            }
        }
        None
    });

    let session_id_send = session_id.clone();

    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Message(msg) => {
                    let Ok(json) = msg.to_json() else {
                        continue;
                    };
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::warn!(session_id = %session_id_send, "Failed to send message to WebSocket");
                        break;
                    }
                }
                Outbound::Close(code) => {
                    let frame = CloseFrame {
                        code: code.as_u16(),
                        reason: code.description().into(),
                    };
                    let _ = ws_sink.send(Message::Close(Some(frame))).await;
                    break;
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    let connection_wd = connection.clone();
    let identify_timeout = state.identify_timeout();
    let heartbeat_timeout = state.heartbeat_timeout();

    let mut watchdog_task = tokio::spawn(async move {
        let mut tick = interval(WATCHDOG_TICK);

        loop {
            tick.tick().await;

            if !connection_wd.is_authenticated().await && connection_wd.age() > identify_timeout {
                tracing::info!(
                    session_id = %connection_wd.session_id(),
                    "Connection did not identify in time"
                );
                return CloseCode::SessionTimeout;
            }

            let since = connection_wd.time_since_heartbeat().await;
            if since > heartbeat_timeout {
                tracing::warn!(
                    session_id = %connection_wd.session_id(),
                    time_since_ms = since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                return CloseCode::SessionTimeout;
            }
        }
    });

    let (close_code, writer_done) = tokio::select! {
        result = &mut recv_task => (result.ok().flatten(), false),
        _ = &mut send_task => (None, true),
        result = &mut watchdog_task => (result.ok(), false),
    };

    recv_task.abort();
    watchdog_task.abort();

    if !writer_done {
        if let Some(code) = close_code {
            tracing::debug!(session_id = %session_id, close_code = %code, "Closing connection");
            connection.close(code).await;
            let _ = tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task).await;
        }
        send_task.abort();
    }

    cleanup_connection(&state, &session_id, &connection).await;
}

/// Parse and handle one text frame. `Err` carries the code to close with.
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = GatewayMessage::parse(text).inspect_err(|code| {
        tracing::debug!(
            session_id = %connection.session_id(),
            close_code = %code,
            "Failed to parse message"
        );
    })?;

    tracing::trace!(
        session_id = %connection.session_id(),
        op = %message.op,
        "Received message"
    );

    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(()) => Ok(()),
        Err(e) => match e.to_close_code() {
            Some(code) => {
                tracing::debug!(session_id = %connection.session_id(), error = %e, "Handler error");
                Err(code)
            }
            None => {
                tracing::debug!(session_id = %connection.session_id(), error = %e, "Frame rejected");
                Ok(())
            }
        },
    }
}

async fn cleanup_connection(state: &GatewayState, session_id: &str, connection: &Arc<Connection>) {
    tracing::info!(session_id = %session_id, "Cleaning up connection");

    connection.set_state(ConnectionState::Disconnected).await;

    if let Err(e) = state.event_dispatcher().detach(session_id).await {
        tracing::warn!(session_id = %session_id, error = %e, "Failed to release relay channel");
    }
}
