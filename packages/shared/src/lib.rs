//! Code shared by the Oekaki server and client.
//!
//! - `protocol`: the JSON wire contract spoken over the game WebSocket
//! - `logger`: tracing subscriber setup for both binaries
//! - `time`: clock abstraction and timestamp formatting

pub mod logger;
pub mod protocol;
pub mod time;
