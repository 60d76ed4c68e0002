//! `MessagePusher` backed by each WebSocket connection's outbound queue.
//!
//! The UI layer creates the bounded channel when it accepts a socket and
//! hands the sender over on join. This type only encodes and enqueues;
//! the writer task on the other end owns the socket.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{
    BroadcastReport, ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomEvent,
};
use crate::infrastructure::dto::websocket::encode;

/// One instance per room; owned by that room's coordinator.
#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    connections: HashMap<ConnectionId, PusherChannel>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    fn enqueue(&self, connection: ConnectionId, frame: String) -> Result<(), MessagePushError> {
        let sender = self
            .connections
            .get(&connection)
            .ok_or(MessagePushError::ConnectionNotFound(connection))?;
        sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::BufferFull(connection),
            TrySendError::Closed(_) => MessagePushError::Closed(connection),
        })
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&mut self, connection: ConnectionId, channel: PusherChannel) {
        self.connections.insert(connection, channel);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
    }

    async fn unregister_connection(&mut self, connection: ConnectionId) {
        // Dropping the sender lets the writer task drain and close the socket.
        if self.connections.remove(&connection).is_some() {
            tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
        }
    }

    async fn push_to(
        &mut self,
        connection: ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let frame = encode(event).map_err(|e| MessagePushError::Encode(e.to_string()))?;
        self.enqueue(connection, frame)
    }

    async fn broadcast(&mut self, targets: &[ConnectionId], event: &RoomEvent) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        if targets.is_empty() {
            return report;
        }

        let frame = match encode(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode event for broadcast: {}", e);
                return report;
            }
        };

        for &target in targets {
            match self.enqueue(target, frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(MessagePushError::BufferFull(id)) => {
                    tracing::warn!("Outbound buffer of '{}' is full, cutting it off", id);
                    report.overflowed.push(id);
                }
                Err(MessagePushError::Closed(id)) => {
                    tracing::debug!("Connection '{}' is closing, skipping", id);
                    report.closed.push(id);
                }
                Err(e) => {
                    tracing::warn!("Skipping broadcast target: {}", e);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // 【何をテストするか】
    // - 送信キューへのフレーム投入（push_to, broadcast）
    // - バッファ溢れ・切断済み接続の報告
    //
    // 【なぜこのテストが必要か】
    // - 遅い接続がルーム全体を止めないことを保証する
    // ========================================

    fn pong() -> RoomEvent {
        RoomEvent::Pong
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にエンコード済みフレームを送信できる
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::channel(4);
        let connection = ConnectionId::generate();
        pusher.register_connection(connection, tx).await;

        // when (操作):
        let result = pusher.push_to(connection, &pong()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(r#"{"type":"pong"}"#.to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let connection = ConnectionId::generate();

        // when (操作):
        let result = pusher.push_to(connection, &pong()).await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ConnectionNotFound(connection)));
    }

    #[tokio::test]
    async fn test_broadcast_reports_overflow_without_blocking() {
        // テスト項目: バッファが満杯の接続は待たずに overflowed として報告される
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (fast_tx, mut fast_rx) = mpsc::channel(4);
        let (slow_tx, _slow_rx) = mpsc::channel(1);
        let fast = ConnectionId::generate();
        let slow = ConnectionId::generate();
        pusher.register_connection(fast, fast_tx).await;
        pusher.register_connection(slow, slow_tx).await;
        pusher.broadcast(&[slow], &pong()).await;

        // when (操作):
        let report = pusher.broadcast(&[fast, slow], &pong()).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.overflowed, vec![slow]);
        assert!(fast_rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_broadcast_reports_closed_receivers() {
        // テスト項目: 受信側が閉じた接続は closed として報告される
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (tx, rx) = mpsc::channel(4);
        let connection = ConnectionId::generate();
        pusher.register_connection(connection, tx).await;
        drop(rx);

        // when (操作):
        let report = pusher.broadcast(&[connection], &pong()).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 0);
        assert_eq!(report.closed, vec![connection]);
    }

    #[tokio::test]
    async fn test_unregister_closes_channel() {
        // テスト項目: 登録解除すると送信側が破棄され、受信側が終端に達する
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::channel(4);
        let connection = ConnectionId::generate();
        pusher.register_connection(connection, tx).await;

        // when (操作):
        pusher.unregister_connection(connection).await;

        // then (期待する結果):
        assert!(pusher.is_empty());
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let mut pusher = WebSocketMessagePusher::new();

        // when (操作):
        let report = pusher.broadcast(&[], &pong()).await;

        // then (期待する結果):
        assert_eq!(report, BroadcastReport::default());
    }
}
