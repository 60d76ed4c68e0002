//! WebSocket connection handler.
//!
//! One socket is split into a writer task fed by the player's bounded
//! outbound queue and a reader loop that forwards decoded frames to the
//! room. Either side ending tears the other down and starts the player's
//! grace window.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use oekaki_shared::protocol::{ClientMessage, ErrorCode, ServerMessage};

use crate::{
    domain::{PlayerName, RoomId},
    ui::state::AppState,
    usecase::{ConnectError, PlayerAction, PlayerSession},
};

/// How long the writer may keep flushing queued frames after the reader ended
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((room_id, player_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|e| {
        tracing::warn!("Rejecting connection: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let name = PlayerName::try_from(player_name).map_err(|e| {
        tracing::warn!("Rejecting connection: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id, name)))
}

fn into_action(message: ClientMessage) -> PlayerAction {
    match message {
        ClientMessage::Draw { data } => PlayerAction::Stroke(data),
        ClientMessage::Guess { guess } => PlayerAction::Guess(guess),
        ClientMessage::StartRound => PlayerAction::StartRound,
        ClientMessage::Chat { text } => PlayerAction::Chat(text),
        ClientMessage::Ping => PlayerAction::Ping,
        ClientMessage::Leave => PlayerAction::Leave,
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId, name: PlayerName) {
    let (mut sender, receiver) = socket.split();
    let (tx, rx) = mpsc::channel(state.config.outbound_buffer.max(1));

    let session = match state
        .connect_player_usecase
        .execute(&room_id, name.clone(), tx)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("'{}' could not join room '{}': {}", name, room_id, e);
            let code = match e {
                ConnectError::NameTaken(_) => ErrorCode::NameTaken,
                ConnectError::RoomUnavailable(_) => ErrorCode::RoomClosed,
            };
            let reply = ServerMessage::Error {
                code,
                message: e.to_string(),
            };
            if let Ok(json) = serde_json::to_string(&reply) {
                let _ = sender.send(Message::Text(json.into())).await;
            }
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };

    let mut send_task = pusher_loop(rx, sender, state.config.ping_interval());
    let mut recv_task = tokio::spawn(receive_loop(receiver, state.clone(), session.clone()));

    tokio::select! {
        _ = &mut recv_task => {
            state.disconnect_player_usecase.execute(&session);
            // The room drops our queue on disconnect; the writer flushes it and closes.
            if tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task).await.is_err() {
                send_task.abort();
            }
        }
        _ = &mut send_task => {
            recv_task.abort();
            state.disconnect_player_usecase.execute(&session);
        }
    }

    tracing::info!("Connection of '{}' to room '{}' closed", name, room_id);
}

/// Writes queued frames to the socket and pings on an interval.
///
/// Ends with a Close frame once the room drops the queue.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    ping_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ping_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                frame = rx.recv() => match frame {
                    Some(text) => {
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => {
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                },
                _ = ticker.tick() => {
                    if sender.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    session: PlayerSession,
) {
    let heartbeat = state.config.heartbeat_interval;
    let max_errors = state.config.max_protocol_errors;
    let mut protocol_errors = 0u32;

    loop {
        let frame = match tokio::time::timeout(heartbeat, receiver.next()).await {
            Ok(Some(Ok(frame))) => frame,
            Ok(Some(Err(e))) => {
                tracing::debug!("WebSocket error from '{}': {}", session.name, e);
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::info!(
                    "No frame from '{}' within {:?}, treating as lost",
                    session.name,
                    heartbeat
                );
                break;
            }
        };

        let decoded = match frame {
            Message::Text(text) => serde_json::from_str::<ClientMessage>(text.as_str()),
            Message::Binary(_) => {
                Err(serde::de::Error::custom("binary frames are not supported"))
            }
            Message::Close(_) => {
                tracing::debug!("'{}' requested close", session.name);
                break;
            }
            // Ping / Pong only count as liveness.
            _ => continue,
        };

        let dispatched = match decoded {
            Ok(message) => state
                .dispatch_message_usecase
                .execute(&session, into_action(message)),
            Err(e) => {
                protocol_errors += 1;
                tracing::debug!(
                    "Malformed frame {}/{} from '{}': {}",
                    protocol_errors,
                    max_errors,
                    session.name,
                    e
                );
                let reported = state
                    .dispatch_message_usecase
                    .report_malformed(&session, e.to_string());
                if protocol_errors >= max_errors {
                    tracing::warn!("Closing '{}' after repeated malformed frames", session.name);
                    break;
                }
                reported
            }
        };

        if let Err(e) = dispatched {
            tracing::debug!("{}", e);
            break;
        }
    }
}
