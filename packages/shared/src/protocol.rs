//! WebSocket wire protocol.
//!
//! Every frame is a JSON text frame tagged by `"type"`. Field names follow the
//! browser frontend's contract (`guess`, `data`, `drawer`, ...), so the same
//! server can back both the web UI and the terminal client.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Score board snapshot: player name → score
pub type Scores = BTreeMap<String, u32>;

/// Frames sent by a player to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Stroke payload from the drawer; relayed without interpretation
    Draw { data: serde_json::Value },
    /// Guess against the hidden word
    Guess { guess: String },
    /// Request to begin the next round
    StartRound,
    /// Free chat line
    Chat { text: String },
    /// Application-level heartbeat
    Ping,
    /// Explicit leave; skips the reconnection grace window
    Leave,
}

/// Frames sent by the server to a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    PlayerJoined {
        player: String,
        players: Vec<String>,
        scores: Scores,
    },
    PlayerLeft {
        player: String,
        players: Vec<String>,
        scores: Scores,
    },
    /// Sent only to the drawer; carries the secret word
    YourTurn { word: String, round: u64 },
    /// Sent to everyone but the drawer; never carries the word
    RoundStart { drawer: String, round: u64 },
    Draw {
        data: serde_json::Value,
    },
    CorrectGuess {
        player: String,
        word: String,
        scores: Scores,
    },
    RoundEnd {
        word: String,
        reason: RoundEndReason,
        scores: Scores,
    },
    Chat {
        player: String,
        text: String,
    },
    Pong,
    /// Direct reply to the offending connection only
    Error { code: ErrorCode, message: String },
}

impl ServerMessage {
    /// Wire name of the frame type, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerJoined { .. } => "player_joined",
            Self::PlayerLeft { .. } => "player_left",
            Self::YourTurn { .. } => "your_turn",
            Self::RoundStart { .. } => "round_start",
            Self::Draw { .. } => "draw",
            Self::CorrectGuess { .. } => "correct_guess",
            Self::RoundEnd { .. } => "round_end",
            Self::Chat { .. } => "chat",
            Self::Pong => "pong",
            Self::Error { .. } => "error",
        }
    }
}

/// Why a round closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReason {
    /// Every connected guesser found the word
    AllGuessed,
    /// The drawer left (or its grace window elapsed)
    DrawerLeft,
    /// The round timer fired
    Timeout,
}

impl fmt::Display for RoundEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::AllGuessed => "everyone guessed the word",
            Self::DrawerLeft => "the drawer left",
            Self::Timeout => "time is up",
        };
        f.write_str(text)
    }
}

/// Machine-readable error codes carried by `ServerMessage::Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MalformedMessage,
    NameTaken,
    DrawerCannotGuess,
    NotDrawer,
    RoundInProgress,
    NoRoundInProgress,
    NotEnoughPlayers,
    NoWordsAvailable,
    RoomClosed,
}
