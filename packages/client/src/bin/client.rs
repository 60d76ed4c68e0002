//! Terminal client for the drawing-and-guessing game.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin oekaki-client -- --room abc123 --name alice
//! cargo run --bin oekaki-client -- --url ws://127.0.0.1:3000 --room abc123 --name bob
//! ```

use clap::Parser;
use oekaki_client::runner::run_client;
use oekaki_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "oekaki-client")]
#[command(about = "Terminal client for the drawing-and-guessing game", long_about = None)]
struct Args {
    /// Base WebSocket URL of the server
    #[arg(short = 'u', long, env = "OEKAKI_URL", default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Room to join (created if it does not exist)
    #[arg(short = 'r', long)]
    room: String,

    /// Player name, unique within the room
    #[arg(short = 'n', long)]
    name: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client(args.url, args.room, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
