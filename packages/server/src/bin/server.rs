//! Drawing-and-guessing game server.
//!
//! Players connect to `ws://<host>:<port>/ws/{room_id}/{player_name}`; a room
//! is created by its first player and disappears with its last one.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin oekaki-server
//! cargo run --bin oekaki-server -- --host 0.0.0.0 --port 3000 --round-secs 90
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use oekaki_server::{
    config::GameConfig, domain::ScoringPolicy, infrastructure::word_source::ListWordSource,
    ui::Server,
};
use oekaki_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "oekaki-server")]
#[command(about = "Room-scoped drawing-and-guessing game server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "OEKAKI_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "OEKAKI_PORT", default_value = "8080")]
    port: u16,

    /// Seconds a lost player keeps its seat (0 = leave immediately)
    #[arg(long, env = "OEKAKI_GRACE_SECS", default_value = "10")]
    grace_secs: u64,

    /// Seconds of silence after which a connection counts as lost
    #[arg(long, env = "OEKAKI_HEARTBEAT_SECS", default_value = "30")]
    heartbeat_secs: u64,

    /// Frames buffered per connection before it is cut off
    #[arg(long, env = "OEKAKI_OUTBOUND_BUFFER", default_value = "256")]
    outbound_buffer: usize,

    /// Round time limit in seconds; rounds are untimed when omitted
    #[arg(long, env = "OEKAKI_ROUND_SECS")]
    round_secs: Option<u64>,

    /// Number of recent words a room avoids repeating
    #[arg(long, env = "OEKAKI_RECENT_WORDS", default_value = "10")]
    recent_words: usize,

    /// Members required to start a round
    #[arg(long, env = "OEKAKI_MIN_PLAYERS", default_value = "1")]
    min_players: usize,

    /// Malformed frames tolerated before a connection is closed
    #[arg(long, env = "OEKAKI_MAX_PROTOCOL_ERRORS", default_value = "5")]
    max_protocol_errors: u32,

    /// Points for the first correct guess of a round
    #[arg(long, env = "OEKAKI_FIRST_AWARD", default_value = "10")]
    first_award: u32,

    /// Points taken off for each earlier correct guesser
    #[arg(long, env = "OEKAKI_AWARD_DECREMENT", default_value = "2")]
    award_decrement: u32,

    /// Lowest award for a correct guess
    #[arg(long, env = "OEKAKI_MINIMUM_AWARD", default_value = "2")]
    minimum_award: u32,

    /// Newline-separated word list; the built-in list is used when omitted
    #[arg(long, env = "OEKAKI_WORDS_FILE")]
    words_file: Option<PathBuf>,

    /// Origin allowed by CORS; any origin when omitted
    #[arg(long, env = "OEKAKI_ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            grace_period: Duration::from_secs(self.grace_secs),
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs.max(1)),
            outbound_buffer: self.outbound_buffer.max(1),
            round_duration: self.round_secs.map(Duration::from_secs),
            recent_words_capacity: self.recent_words,
            min_players: self.min_players,
            max_protocol_errors: self.max_protocol_errors.max(1),
            scoring: ScoringPolicy {
                first_award: self.first_award,
                decrement: self.award_decrement,
                minimum_award: self.minimum_award,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = args.game_config();
    tracing::debug!("{:?}", config);

    let words = match &args.words_file {
        Some(path) => match ListWordSource::from_file(path) {
            Ok(words) => words,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => ListWordSource::default_words(),
    };
    tracing::info!("Loaded {} words", words.words().len());

    let mut server = Server::build(config, Arc::new(words), Arc::new(SystemClock));
    if let Some(origin) = &args.allowed_origin {
        server = match server.with_allowed_origin(origin) {
            Ok(server) => server,
            Err(e) => {
                tracing::error!("Invalid --allowed-origin '{}': {}", origin, e);
                std::process::exit(1);
            }
        };
    }

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
