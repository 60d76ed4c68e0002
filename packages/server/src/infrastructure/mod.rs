//! Infrastructure layer: concrete implementations of the domain's ports.

pub mod dto;
pub mod message_pusher;
pub mod word_source;
