//! Data Transfer Objects (DTOs).
//!
//! - `websocket`: conversion of room events into wire frames (`oekaki_shared::protocol`)
//! - `http`: HTTP API response DTOs

pub mod http;
pub mod websocket;
