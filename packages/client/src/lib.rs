//! Terminal client for the drawing-and-guessing game.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod shim;
pub mod ui;
