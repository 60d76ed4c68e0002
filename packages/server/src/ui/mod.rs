//! axum front end: WebSocket game endpoint and the read-only HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
