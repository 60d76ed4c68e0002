//! Commands accepted by a room coordinator.

use serde_json::Value;
use tokio::sync::oneshot;

use crate::domain::{ConnectionId, PlayerName, PusherChannel, RoomError, RoomSnapshot};

/// A connection asking for a seat in the room
#[derive(Debug)]
pub struct JoinRequest {
    pub name: PlayerName,
    pub connection: ConnectionId,
    pub channel: PusherChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinAccepted {
    /// The name was inside its grace window and kept its score
    pub reconnected: bool,
}

/// Hands the request back so the caller still owns the connection's channel.
#[derive(Debug)]
pub struct JoinRejected {
    pub error: RoomError,
    pub request: JoinRequest,
}

pub type JoinReply = oneshot::Sender<Result<JoinAccepted, JoinRejected>>;

/// What a seated player asked for
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    Stroke(Value),
    Guess(String),
    StartRound,
    Chat(String),
    Ping,
    Leave,
    /// The frame could not be decoded
    Malformed(String),
}

#[derive(Debug)]
pub enum RoomCommand {
    Join {
        request: JoinRequest,
        reply: JoinReply,
    },
    Act {
        name: PlayerName,
        connection: ConnectionId,
        action: PlayerAction,
    },
    /// The transport under `connection` is gone
    Disconnect {
        name: PlayerName,
        connection: ConnectionId,
    },
    GraceExpired {
        name: PlayerName,
        generation: u64,
    },
    RoundTimeout {
        round: u64,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot>,
    },
}
