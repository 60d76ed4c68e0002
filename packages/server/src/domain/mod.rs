//! Domain layer: the rules of a drawing-and-guessing room.
//!
//! Nothing here performs I/O. The `Room` state machine returns
//! [`Notification`]s describing who should hear about each change, and the
//! usecase layer decides how to deliver them.

pub mod entity;
pub mod error;
pub mod pusher;
pub mod room;
pub mod scoring;
pub mod value_object;
pub mod word_source;

pub use entity::{Player, RecentWords, Round};
pub use error::{RoomError, ValueObjectError};
pub use pusher::{BroadcastReport, MessagePushError, MessagePusher, PusherChannel};
pub use room::{
    Audience, Detached, Joined, Notification, PlayerSnapshot, Room, RoomEvent, RoomSettings,
    RoomSnapshot, RoundEndReason, RoundState, ScoreBoard,
};
pub use scoring::ScoringPolicy;
pub use value_object::{ConnectionId, PlayerName, RoomId};
pub use word_source::WordSource;
