//! Server wiring and execution.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header::InvalidHeaderValue},
    routing::get,
};
use oekaki_shared::time::Clock;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::GameConfig,
    domain::{MessagePusher, WordSource},
    infrastructure::message_pusher::WebSocketMessagePusher,
    usecase::{
        ConnectPlayerUseCase, DisconnectPlayerUseCase, DispatchMessageUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, RoomRegistry,
    },
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, root, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Drawing-and-guessing game server
///
/// # Example
///
/// ```ignore
/// let server = Server::build(
///     GameConfig::default(),
///     Arc::new(ListWordSource::default_words()),
///     Arc::new(SystemClock),
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// `None` allows any origin
    allowed_origin: Option<HeaderValue>,
}

impl Server {
    /// Wire the registry, use cases and state together.
    pub fn build(config: GameConfig, words: Arc<dyn WordSource>, clock: Arc<dyn Clock>) -> Self {
        let registry = RoomRegistry::new(
            config.clone(),
            words,
            clock,
            Arc::new(|| Box::new(WebSocketMessagePusher::new()) as Box<dyn MessagePusher>),
        );

        let state = Arc::new(AppState {
            connect_player_usecase: Arc::new(ConnectPlayerUseCase::new(registry.clone())),
            dispatch_message_usecase: Arc::new(DispatchMessageUseCase::new()),
            disconnect_player_usecase: Arc::new(DisconnectPlayerUseCase::new()),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(registry.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(registry)),
            config,
        });

        Self {
            state,
            allowed_origin: None,
        }
    }

    pub fn with_allowed_origin(mut self, origin: &str) -> Result<Self, InvalidHeaderValue> {
        self.allowed_origin = Some(HeaderValue::from_str(origin)?);
        Ok(self)
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new().allow_methods([Method::GET]);
        let cors = match &self.allowed_origin {
            Some(origin) => cors.allow_origin(origin.clone()),
            None => cors.allow_origin(Any),
        };

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/{room_id}/{player_name}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(root))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on an already bound listener until the task is dropped.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }

    /// Bind `host:port` and serve until Ctrl+C / SIGTERM.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Game server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/{{room_id}}/{{player_name}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
