//! The room state machine.
//!
//! `Idle → AwaitingStart → InProgress → RoundEnded`. A new round starts
//! straight from `RoundEnded` (or `AwaitingStart`), so the room alternates
//! `InProgress → RoundEnded → InProgress ...` and returns to `Idle` only when
//! the last member leaves. Every operation either fails with a
//! [`RoomError`] and leaves the room untouched, or applies its change and
//! returns the [`Notification`]s that must be delivered, in order.

use super::{
    entity::{Player, RecentWords, Round},
    error::RoomError,
    scoring::ScoringPolicy,
    value_object::{ConnectionId, PlayerName, RoomId},
    word_source::WordSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Idle,
    AwaitingStart,
    InProgress,
    RoundEnded,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingStart => "awaiting_start",
            Self::InProgress => "in_progress",
            Self::RoundEnded => "round_ended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEndReason {
    AllGuessed,
    DrawerLeft,
    Timeout,
}

/// Score board in join order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub entries: Vec<(PlayerName, u32)>,
}

impl ScoreBoard {
    pub fn score_of(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(player, _)| player.as_str() == name)
            .map(|(_, score)| *score)
    }
}

/// Something that happened in a room, addressed to some of its members
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    PlayerJoined {
        player: PlayerName,
        board: ScoreBoard,
    },
    PlayerLeft {
        player: PlayerName,
        board: ScoreBoard,
    },
    YourTurn {
        word: String,
        round: u64,
    },
    RoundStarted {
        drawer: PlayerName,
        round: u64,
    },
    Stroke {
        data: serde_json::Value,
    },
    CorrectGuess {
        player: PlayerName,
        word: String,
        board: ScoreBoard,
    },
    RoundEnded {
        word: String,
        reason: RoundEndReason,
        board: ScoreBoard,
    },
    Chat {
        player: PlayerName,
        text: String,
    },
    Pong,
    Rejected(RoomError),
}

/// Which members a notification is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    All,
    AllExcept(PlayerName),
    Only(PlayerName),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub audience: Audience,
    pub event: RoomEvent,
}

impl Notification {
    pub fn all(event: RoomEvent) -> Self {
        Self {
            audience: Audience::All,
            event,
        }
    }

    pub fn all_except(name: PlayerName, event: RoomEvent) -> Self {
        Self {
            audience: Audience::AllExcept(name),
            event,
        }
    }

    pub fn only(name: PlayerName, event: RoomEvent) -> Self {
        Self {
            audience: Audience::Only(name),
            event,
        }
    }
}

/// Result of a successful join
#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    /// The name belonged to a member inside its grace window
    pub reconnected: bool,
    pub notifications: Vec<Notification>,
}

/// Result of detaching a live connection
#[derive(Debug, Clone, PartialEq)]
pub struct Detached {
    /// Stamp the grace timer must carry to evict this member
    pub generation: u64,
    pub notifications: Vec<Notification>,
}

/// Per-room tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSettings {
    pub scoring: ScoringPolicy,
    pub recent_words_capacity: usize,
    pub min_players: usize,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            scoring: ScoringPolicy::default(),
            recent_words_capacity: 10,
            min_players: 1,
        }
    }
}

/// Read-only view of a room for the HTTP API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub state: RoundState,
    pub drawer: Option<PlayerName>,
    pub round: Option<u64>,
    pub created_at: i64,
    pub players: Vec<PlayerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub name: PlayerName,
    pub score: u32,
    pub connected: bool,
}

/// State of one room. Owned and mutated by exactly one coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    id: RoomId,
    created_at: i64,
    /// Join order, which is also the turn order
    members: Vec<Player>,
    /// Index of the current (or most recent) drawer; the rotation cursor
    drawer_index: Option<usize>,
    state: RoundState,
    /// `Some` iff `state == InProgress`
    round: Option<Round>,
    rounds_played: u64,
    recent_words: RecentWords,
    settings: RoomSettings,
}

impl Room {
    pub fn new(id: RoomId, created_at: i64, settings: RoomSettings) -> Self {
        Self {
            id,
            created_at,
            members: Vec::new(),
            drawer_index: None,
            state: RoundState::Idle,
            round: None,
            rounds_played: 0,
            recent_words: RecentWords::new(settings.recent_words_capacity),
            settings,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn members(&self) -> &[Player] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn player(&self, name: &PlayerName) -> Option<&Player> {
        self.members.iter().find(|p| p.name == *name)
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// The member currently holding the drawer role
    pub fn drawer(&self) -> Option<&PlayerName> {
        self.round.as_ref().map(|round| &round.drawer)
    }

    /// Empty unless a round is in progress
    pub fn secret_word(&self) -> &str {
        self.round.as_ref().map_or("", |round| round.word.as_str())
    }

    pub fn recent_words(&self) -> &RecentWords {
        &self.recent_words
    }

    /// Whether `connection` is the live connection of `name`
    pub fn is_attached(&self, name: &PlayerName, connection: ConnectionId) -> bool {
        self.player(name)
            .is_some_and(|p| p.connection == Some(connection))
    }

    pub fn name_of(&self, connection: ConnectionId) -> Option<&PlayerName> {
        self.members
            .iter()
            .find(|p| p.connection == Some(connection))
            .map(|p| &p.name)
    }

    pub fn score_board(&self) -> ScoreBoard {
        ScoreBoard {
            entries: self
                .members
                .iter()
                .map(|p| (p.name.clone(), p.score))
                .collect(),
        }
    }

    /// Resolve an audience to the live connections it covers.
    pub fn recipients(&self, audience: &Audience) -> Vec<ConnectionId> {
        self.members
            .iter()
            .filter(|p| match audience {
                Audience::All => true,
                Audience::AllExcept(excluded) => p.name != *excluded,
                Audience::Only(target) => p.name == *target,
            })
            .filter_map(|p| p.connection)
            .collect()
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id.clone(),
            state: self.state,
            drawer: self.drawer().cloned(),
            round: self.round.as_ref().map(|round| round.number),
            created_at: self.created_at,
            players: self
                .members
                .iter()
                .map(|p| PlayerSnapshot {
                    name: p.name.clone(),
                    score: p.score,
                    connected: p.is_connected(),
                })
                .collect(),
        }
    }

    /// Add a member, or re-attach one that is inside its grace window.
    ///
    /// The joiner receives the full score board like everyone else, plus the
    /// current round (or its own word, when the drawer reconnects).
    pub fn join(
        &mut self,
        name: PlayerName,
        connection: ConnectionId,
        now: i64,
    ) -> Result<Joined, RoomError> {
        let reconnected = match self.members.iter_mut().find(|p| p.name == name) {
            Some(player) if player.is_connected() => {
                return Err(RoomError::NameTaken(name.into_string()));
            }
            Some(player) => {
                player.attach(connection);
                true
            }
            None => {
                self.members
                    .push(Player::new(name.clone(), connection, now));
                false
            }
        };

        if self.state == RoundState::Idle {
            self.state = RoundState::AwaitingStart;
        }

        let mut notifications = vec![Notification::all(RoomEvent::PlayerJoined {
            player: name.clone(),
            board: self.score_board(),
        })];
        if let Some(round) = &self.round {
            let resync = if round.drawer == name {
                RoomEvent::YourTurn {
                    word: round.word.clone(),
                    round: round.number,
                }
            } else {
                RoomEvent::RoundStarted {
                    drawer: round.drawer.clone(),
                    round: round.number,
                }
            };
            notifications.push(Notification::only(name, resync));
        }

        Ok(Joined {
            reconnected,
            notifications,
        })
    }

    /// Mark a member's connection as lost. The departure itself is silent
    /// until the grace window expires, but a member in grace no longer holds
    /// the round open, so this may end it with `all_guessed`.
    pub fn detach(&mut self, name: &PlayerName, connection: ConnectionId) -> Option<Detached> {
        let generation = self
            .members
            .iter_mut()
            .find(|p| p.name == *name)
            .and_then(|p| p.detach(connection))?;
        let mut notifications = Vec::new();
        if self.everyone_guessed() {
            notifications.push(self.end_round(RoundEndReason::AllGuessed));
        }
        Some(Detached {
            generation,
            notifications,
        })
    }

    /// Evict a member whose grace window elapsed without a reconnection.
    pub fn expire(&mut self, name: &PlayerName, generation: u64) -> Vec<Notification> {
        let evictable = self
            .player(name)
            .is_some_and(|p| !p.is_connected() && p.generation == generation);
        if evictable {
            self.leave(name)
        } else {
            Vec::new()
        }
    }

    /// Remove a member.
    ///
    /// A departing drawer ends the round with no winner and reveals the word.
    pub fn leave(&mut self, name: &PlayerName) -> Vec<Notification> {
        let Some(index) = self.members.iter().position(|p| p.name == *name) else {
            return Vec::new();
        };
        self.members.remove(index);
        self.drawer_index = match self.drawer_index {
            Some(cursor) if index < cursor => Some(cursor - 1),
            Some(cursor) if index == cursor => cursor.checked_sub(1),
            cursor => cursor,
        };

        let mut notifications = vec![Notification::all(RoomEvent::PlayerLeft {
            player: name.clone(),
            board: self.score_board(),
        })];
        if self.drawer() == Some(name) {
            notifications.push(self.end_round(RoundEndReason::DrawerLeft));
        } else if self.everyone_guessed() {
            notifications.push(self.end_round(RoundEndReason::AllGuessed));
        }

        if self.members.is_empty() {
            self.state = RoundState::Idle;
            self.round = None;
            self.drawer_index = None;
        }
        notifications
    }

    /// Begin the next round with the next connected member in join order.
    pub fn start_round(
        &mut self,
        words: &dyn WordSource,
        now: i64,
    ) -> Result<Vec<Notification>, RoomError> {
        if self.state == RoundState::InProgress {
            return Err(RoomError::RoundInProgress);
        }
        let required = self.settings.min_players.max(1);
        if self.members.len() < required {
            return Err(RoomError::NotEnoughPlayers(required));
        }
        let drawer_index = self
            .next_drawer_index()
            .ok_or(RoomError::NotEnoughPlayers(required))?;
        let word = words
            .next_word(&self.recent_words)
            .map(|word| word.trim().to_string())
            .filter(|word| !word.is_empty())
            .ok_or(RoomError::NoWordsAvailable)?;

        self.rounds_played += 1;
        self.drawer_index = Some(drawer_index);
        self.recent_words.push(word.clone());
        let drawer = self.members[drawer_index].name.clone();
        let number = self.rounds_played;
        self.round = Some(Round::new(number, drawer.clone(), word.clone(), now));
        self.state = RoundState::InProgress;

        Ok(vec![
            Notification::only(
                drawer.clone(),
                RoomEvent::YourTurn {
                    word,
                    round: number,
                },
            ),
            Notification::all_except(
                drawer.clone(),
                RoomEvent::RoundStarted {
                    drawer,
                    round: number,
                },
            ),
        ])
    }

    /// Check a guess. The first correct guess of each player scores; incorrect
    /// guesses are echoed to the others as chat.
    pub fn submit_guess(
        &mut self,
        name: &PlayerName,
        text: &str,
    ) -> Result<Vec<Notification>, RoomError> {
        let round = self.round.as_mut().ok_or(RoomError::NoRoundInProgress)?;
        if round.drawer == *name {
            return Err(RoomError::DrawerCannotGuess);
        }
        let guess = text.trim();
        if guess.is_empty() || round.has_guessed(name) {
            return Ok(Vec::new());
        }
        if !round.matches(guess) {
            return Ok(vec![Notification::all_except(
                name.clone(),
                RoomEvent::Chat {
                    player: name.clone(),
                    text: guess.to_string(),
                },
            )]);
        }

        let award = self.settings.scoring.award(round.correct_guessers.len());
        round.correct_guessers.push(name.clone());
        let word = round.word.clone();
        if let Some(player) = self.members.iter_mut().find(|p| p.name == *name) {
            player.score = player.score.saturating_add(award);
        }

        let mut notifications = vec![Notification::all(RoomEvent::CorrectGuess {
            player: name.clone(),
            word,
            board: self.score_board(),
        })];
        if self.everyone_guessed() {
            notifications.push(self.end_round(RoundEndReason::AllGuessed));
        }
        Ok(notifications)
    }

    /// Relay a stroke from the drawer to everyone else, untouched.
    pub fn relay_stroke(
        &self,
        name: &PlayerName,
        data: serde_json::Value,
    ) -> Result<Notification, RoomError> {
        let round = self.round.as_ref().ok_or(RoomError::NoRoundInProgress)?;
        if round.drawer != *name {
            return Err(RoomError::NotDrawer);
        }
        Ok(Notification::all_except(
            name.clone(),
            RoomEvent::Stroke { data },
        ))
    }

    pub fn chat(&self, name: &PlayerName, text: &str) -> Vec<Notification> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        vec![Notification::all_except(
            name.clone(),
            RoomEvent::Chat {
                player: name.clone(),
                text: text.to_string(),
            },
        )]
    }

    /// Close round `number` if it is still running.
    pub fn time_out(&mut self, number: u64) -> Vec<Notification> {
        if self.round.as_ref().is_some_and(|round| round.number == number) {
            vec![self.end_round(RoundEndReason::Timeout)]
        } else {
            Vec::new()
        }
    }

    fn next_drawer_index(&self) -> Option<usize> {
        let len = self.members.len();
        let start = self.drawer_index.map_or(0, |cursor| cursor + 1);
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| self.members[index].is_connected())
    }

    /// At least one correct guess, and every connected guesser has one.
    fn everyone_guessed(&self) -> bool {
        let Some(round) = &self.round else {
            return false;
        };
        !round.correct_guessers.is_empty()
            && self
                .members
                .iter()
                .filter(|p| p.name != round.drawer && p.is_connected())
                .all(|p| round.has_guessed(&p.name))
    }

    fn end_round(&mut self, reason: RoundEndReason) -> Notification {
        let word = self.round.take().map(|round| round.word).unwrap_or_default();
        self.state = RoundState::RoundEnded;
        Notification::all(RoomEvent::RoundEnded {
            word,
            reason,
            board: self.score_board(),
        })
    }
}
