//! Outbound delivery interface.
//!
//! The domain only knows connections by [`ConnectionId`]; the concrete pusher
//! maps them to channels and encodes [`RoomEvent`]s for the wire.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{room::RoomEvent, value_object::ConnectionId};

/// Bounded queue of encoded frames feeding one connection's writer task
pub type PusherChannel = mpsc::Sender<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("outbound buffer of connection {0} is full")]
    BufferFull(ConnectionId),

    #[error("connection {0} is closed")]
    Closed(ConnectionId),

    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// Result of one fan-out dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    /// Connections whose buffer overflowed; the caller must detach them
    pub overflowed: Vec<ConnectionId>,
    /// Connections found closed (mid-close) and skipped
    pub closed: Vec<ConnectionId>,
}

/// Delivers room events to connections.
///
/// Delivery is best-effort and at-most-once per call. Implementations must
/// never wait on a slow connection.
#[async_trait]
pub trait MessagePusher: Send {
    async fn register_connection(&mut self, connection: ConnectionId, channel: PusherChannel);

    async fn unregister_connection(&mut self, connection: ConnectionId);

    async fn push_to(
        &mut self,
        connection: ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;

    async fn broadcast(&mut self, targets: &[ConnectionId], event: &RoomEvent) -> BroadcastReport;
}
