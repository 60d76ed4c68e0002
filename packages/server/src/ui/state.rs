//! Shared application state.

use std::sync::Arc;

use crate::{
    config::GameConfig,
    usecase::{
        ConnectPlayerUseCase, DisconnectPlayerUseCase, DispatchMessageUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase,
    },
};

pub struct AppState {
    pub connect_player_usecase: Arc<ConnectPlayerUseCase>,
    pub dispatch_message_usecase: Arc<DispatchMessageUseCase>,
    pub disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// Heartbeat, buffer and protocol-error limits for connection handlers
    pub config: GameConfig,
}
