//! One WebSocket session against a room.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use oekaki_shared::{
    protocol::{ClientMessage, ErrorCode, ServerMessage},
    time::now_millis,
};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    domain::{UserCommand, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    shim::{IntentError, ShimEvent, ShimState, SyncShim},
    ui::redisplay_prompt,
};

/// Application-level keepalive, well inside the server's heartbeat window
const PING_INTERVAL: Duration = Duration::from_secs(10);

/// How a session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user left the room
    Left,
    /// The input stream closed (Ctrl+C / Ctrl+D)
    InputClosed,
}

/// `ws://host:port` + room + name → game endpoint URL
pub fn room_url(base: &str, room: &str, name: &str) -> String {
    format!("{}/ws/{}/{}", base.trim_end_matches('/'), room, name)
}

fn print_events(events: &[ShimEvent], me: &str) {
    for event in events {
        print!("{}", MessageFormatter::format_event(event, me, now_millis()));
    }
    if !events.is_empty() {
        redisplay_prompt(me);
    }
}

fn print_local_error(message: &str, me: &str) {
    print!("{}", MessageFormatter::format_local_error(message));
    redisplay_prompt(me);
}

/// Turn a typed command into the frame to send, if any.
fn to_message(command: UserCommand, shim: &mut SyncShim) -> Result<Option<ClientMessage>, IntentError> {
    let message = match command {
        UserCommand::StartRound => shim.start_round()?,
        UserCommand::Leave => shim.leave()?,
        UserCommand::Draw(data) => shim.draw(data)?,
        UserCommand::Chat(text) => shim.chat(&text)?,
        UserCommand::Text(text) if shim.state() == ShimState::ConnectedGuessing => {
            shim.guess(&text)?
        }
        UserCommand::Text(text) => shim.chat(&text)?,
        UserCommand::Scores => {
            print!(
                "{}",
                MessageFormatter::format_scores(shim.players(), shim.scores(), shim.me())
            );
            redisplay_prompt(shim.me());
            return Ok(None);
        }
        UserCommand::Help => {
            print!("{}", MessageFormatter::format_help());
            redisplay_prompt(shim.me());
            return Ok(None);
        }
    };
    Ok(Some(message))
}

/// Run one WebSocket session, feeding frames through `shim`.
pub async fn run_client_session(
    url: &str,
    shim: &mut SyncShim,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to game server!");
    let me = shim.me().to_string();
    print_events(&shim.on_open(), &me);
    println!("\nYou are '{}'. Type /help for commands. Press Ctrl+C to exit.\n", me);

    let (mut write, mut read) = ws_stream.split();
    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await;
    let mut leaving = false;

    let result = loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let message = match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::warn!("Unexpected frame from server: {}", e);
                            continue;
                        }
                    };
                    if let ServerMessage::Error { code: ErrorCode::NameTaken, .. } = message {
                        break Err(ClientError::NameTaken(me.clone()));
                    }
                    let events = shim.apply(message);
                    print_events(&events, &me);
                }
                Some(Ok(Message::Close(_))) | None => {
                    if leaving {
                        break Ok(SessionEnd::Left);
                    }
                    tracing::info!("Server closed the connection");
                    break Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break Err(ClientError::ConnectionError(e.to_string()));
                }
            },
            line = input_rx.recv() => {
                let Some(line) = line else {
                    let _ = write.send(Message::Close(None)).await;
                    break Ok(SessionEnd::InputClosed);
                };
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        print_local_error(&e.to_string(), &me);
                        continue;
                    }
                };
                let message = match to_message(command, shim) {
                    Ok(Some(message)) => message,
                    Ok(None) => continue,
                    Err(e) => {
                        print_local_error(&e.to_string(), &me);
                        continue;
                    }
                };
                leaving |= message == ClientMessage::Leave;
                let json = match serde_json::to_string(&message) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::text(json)).await {
                    tracing::warn!("Failed to send message: {}", e);
                    break Err(ClientError::ConnectionError(e.to_string()));
                }
            },
            _ = ping.tick() => {
                let Ok(json) = serde_json::to_string(&ClientMessage::Ping) else {
                    continue;
                };
                if let Err(e) = write.send(Message::text(json)).await {
                    break Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    };

    print_events(&shim.on_close(), &me);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_url() {
        // テスト項目: ベース URL・ルーム・名前からエンドポイント URL が組み立てられる
        // given (前提条件):
        let base = "ws://127.0.0.1:8080/";

        // when (操作):
        let url = room_url(base, "abc", "alice");

        // then (期待する結果):
        assert_eq!(url, "ws://127.0.0.1:8080/ws/abc/alice");
    }

    #[test]
    fn test_plain_text_is_guess_while_guessing() {
        // テスト項目: 推測中の通常入力は推測として送信される
        // given (前提条件):
        let mut shim = SyncShim::new("bob");
        shim.on_open();
        shim.apply(ServerMessage::RoundStart {
            drawer: "alice".to_string(),
            round: 1,
        });

        // when (操作):
        let message = to_message(UserCommand::Text("cat".to_string()), &mut shim);

        // then (期待する結果):
        assert_eq!(
            message,
            Ok(Some(ClientMessage::Guess {
                guess: "cat".to_string()
            }))
        );
    }

    #[test]
    fn test_plain_text_is_chat_while_idle() {
        // テスト項目: ラウンド外の通常入力はチャットとして送信される
        // given (前提条件):
        let mut shim = SyncShim::new("bob");
        shim.on_open();

        // when (操作):
        let message = to_message(UserCommand::Text("hi all".to_string()), &mut shim);

        // then (期待する結果):
        assert_eq!(
            message,
            Ok(Some(ClientMessage::Chat {
                text: "hi all".to_string()
            }))
        );
    }
}
