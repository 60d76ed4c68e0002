//! Client-side mirror of one room, seen from a single player.
//!
//! [`SyncShim`] is driven by inbound [`ServerMessage`]s and by local intents.
//! It never talks to the socket itself: `apply` returns [`ShimEvent`]s for the
//! UI, and intents return the [`ClientMessage`] to send.

use std::collections::VecDeque;

use oekaki_shared::protocol::{ClientMessage, ErrorCode, RoundEndReason, Scores, ServerMessage};
use serde_json::Value;
use thiserror::Error;

const TRANSCRIPT_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShimState {
    Connecting,
    ConnectedIdle,
    ConnectedDrawing,
    ConnectedGuessing,
    Disconnected,
}

impl ShimState {
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            Self::ConnectedIdle | Self::ConnectedDrawing | Self::ConnectedGuessing
        )
    }
}

/// Something the UI should show
#[derive(Debug, Clone, PartialEq)]
pub enum ShimEvent {
    Connected,
    Disconnected,
    PlayerJoined { player: String },
    PlayerLeft { player: String },
    /// We are drawing; the word is ours alone
    YourTurn { word: String, round: u64 },
    RoundStarted { drawer: String, round: u64 },
    Stroke(Value),
    CorrectGuess { player: String, word: String },
    RoundEnded { word: String, reason: RoundEndReason },
    Chat { player: String, text: String },
    Error { code: ErrorCode, message: String },
}

/// Intents refused locally, before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("not connected")]
    NotConnected,

    #[error("you are drawing; you cannot guess")]
    DrawerCannotGuess,

    #[error("only the drawer can draw")]
    NotDrawer,

    #[error("no round is in progress")]
    NoRoundInProgress,

    #[error("a round is already in progress")]
    RoundInProgress,

    #[error("nothing to send")]
    EmptyText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub player: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct SyncShim {
    me: String,
    state: ShimState,
    /// Members in join order
    players: Vec<String>,
    scores: Scores,
    drawer: Option<String>,
    /// Only known while we are the drawer
    current_word: Option<String>,
    round: Option<u64>,
    transcript: VecDeque<TranscriptEntry>,
}

impl SyncShim {
    pub fn new(me: impl Into<String>) -> Self {
        Self {
            me: me.into(),
            state: ShimState::Connecting,
            players: Vec::new(),
            scores: Scores::new(),
            drawer: None,
            current_word: None,
            round: None,
            transcript: VecDeque::new(),
        }
    }

    pub fn me(&self) -> &str {
        &self.me
    }

    pub fn state(&self) -> ShimState {
        self.state
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn drawer(&self) -> Option<&str> {
        self.drawer.as_deref()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    pub fn round(&self) -> Option<u64> {
        self.round
    }

    pub fn transcript(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.transcript.iter()
    }

    /// The socket is open. Round state is unknown until the server resyncs us.
    pub fn on_open(&mut self) -> Vec<ShimEvent> {
        self.state = ShimState::ConnectedIdle;
        self.clear_round();
        vec![ShimEvent::Connected]
    }

    pub fn on_close(&mut self) -> Vec<ShimEvent> {
        if self.state == ShimState::Disconnected {
            return Vec::new();
        }
        self.state = ShimState::Disconnected;
        self.clear_round();
        vec![ShimEvent::Disconnected]
    }

    pub fn apply(&mut self, message: ServerMessage) -> Vec<ShimEvent> {
        match message {
            ServerMessage::PlayerJoined {
                player,
                players,
                scores,
            } => {
                self.players = players;
                self.scores = scores;
                vec![ShimEvent::PlayerJoined { player }]
            }
            ServerMessage::PlayerLeft {
                player,
                players,
                scores,
            } => {
                self.players = players;
                self.scores = scores;
                vec![ShimEvent::PlayerLeft { player }]
            }
            ServerMessage::YourTurn { word, round } => {
                self.state = ShimState::ConnectedDrawing;
                self.drawer = Some(self.me.clone());
                self.current_word = Some(word.clone());
                self.round = Some(round);
                vec![ShimEvent::YourTurn { word, round }]
            }
            ServerMessage::RoundStart { drawer, round } => {
                self.state = ShimState::ConnectedGuessing;
                self.drawer = Some(drawer.clone());
                self.current_word = None;
                self.round = Some(round);
                vec![ShimEvent::RoundStarted { drawer, round }]
            }
            ServerMessage::Draw { data } => vec![ShimEvent::Stroke(data)],
            ServerMessage::CorrectGuess {
                player,
                word,
                scores,
            } => {
                self.scores = scores;
                vec![ShimEvent::CorrectGuess { player, word }]
            }
            ServerMessage::RoundEnd {
                word,
                reason,
                scores,
            } => {
                self.scores = scores;
                self.state = ShimState::ConnectedIdle;
                self.clear_round();
                vec![ShimEvent::RoundEnded { word, reason }]
            }
            ServerMessage::Chat { player, text } => {
                self.record(player.clone(), text.clone());
                vec![ShimEvent::Chat { player, text }]
            }
            ServerMessage::Pong => Vec::new(),
            ServerMessage::Error { code, message } => vec![ShimEvent::Error { code, message }],
        }
    }

    pub fn guess(&mut self, text: &str) -> Result<ClientMessage, IntentError> {
        match self.state {
            ShimState::ConnectedGuessing => {}
            ShimState::ConnectedDrawing => return Err(IntentError::DrawerCannotGuess),
            ShimState::ConnectedIdle => return Err(IntentError::NoRoundInProgress),
            ShimState::Connecting | ShimState::Disconnected => {
                return Err(IntentError::NotConnected);
            }
        }
        let guess = non_empty(text)?;
        self.record(self.me.clone(), guess.clone());
        Ok(ClientMessage::Guess { guess })
    }

    pub fn draw(&self, data: Value) -> Result<ClientMessage, IntentError> {
        match self.state {
            ShimState::ConnectedDrawing => Ok(ClientMessage::Draw { data }),
            ShimState::Connecting | ShimState::Disconnected => Err(IntentError::NotConnected),
            _ => Err(IntentError::NotDrawer),
        }
    }

    pub fn start_round(&self) -> Result<ClientMessage, IntentError> {
        match self.state {
            ShimState::ConnectedIdle => Ok(ClientMessage::StartRound),
            ShimState::ConnectedDrawing | ShimState::ConnectedGuessing => {
                Err(IntentError::RoundInProgress)
            }
            ShimState::Connecting | ShimState::Disconnected => Err(IntentError::NotConnected),
        }
    }

    pub fn chat(&mut self, text: &str) -> Result<ClientMessage, IntentError> {
        if !self.state.is_connected() {
            return Err(IntentError::NotConnected);
        }
        let text = non_empty(text)?;
        self.record(self.me.clone(), text.clone());
        Ok(ClientMessage::Chat { text })
    }

    pub fn leave(&mut self) -> Result<ClientMessage, IntentError> {
        if !self.state.is_connected() {
            return Err(IntentError::NotConnected);
        }
        Ok(ClientMessage::Leave)
    }

    fn clear_round(&mut self) {
        self.drawer = None;
        self.current_word = None;
        self.round = None;
    }

    fn record(&mut self, player: String, text: String) {
        if self.transcript.len() == TRANSCRIPT_CAPACITY {
            self.transcript.pop_front();
        }
        self.transcript.push_back(TranscriptEntry { player, text });
    }
}

fn non_empty(text: &str) -> Result<String, IntentError> {
    let text = text.trim();
    if text.is_empty() {
        Err(IntentError::EmptyText)
    } else {
        Ok(text.to_string())
    }
}
