//! Room-scoped drawing-and-guessing game server.
//!
//! Layers, inside out: `domain` (pure room rules), `usecase` (per-room
//! coordinator actors and the room registry), `infrastructure` (wire
//! encoding, outbound queues, word lists) and `ui` (axum endpoints).

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
