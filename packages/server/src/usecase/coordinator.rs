//! Single-writer actor owning one room.
//!
//! Every mutation of a room happens inside [`RoomCoordinator::run`], one
//! command at a time, so all members observe the same order of events.
//! Timers and connections only ever talk to it through its command queue.

use std::{collections::VecDeque, time::Duration};

use tokio::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};
use uuid::Uuid;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, Notification, PlayerName, Room, RoomError,
    RoomEvent, RoomId,
};

use super::{
    command::{JoinAccepted, JoinRejected, JoinReply, JoinRequest, PlayerAction, RoomCommand},
    registry::RoomRegistry,
};

pub struct RoomCoordinator {
    room: Room,
    instance: Uuid,
    registry: RoomRegistry,
    pusher: Box<dyn MessagePusher>,
    receiver: UnboundedReceiver<RoomCommand>,
    /// Weak so pending timers never keep a released room alive
    sender: WeakUnboundedSender<RoomCommand>,
}

impl RoomCoordinator {
    pub fn new(
        room_id: RoomId,
        instance: Uuid,
        registry: RoomRegistry,
        pusher: Box<dyn MessagePusher>,
        receiver: UnboundedReceiver<RoomCommand>,
        sender: WeakUnboundedSender<RoomCommand>,
    ) -> Self {
        let room = Room::new(room_id, registry.now(), registry.config().room_settings());
        Self {
            room,
            instance,
            registry,
            pusher,
            receiver,
            sender,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!("Coordinator for room '{}' started", self.room.id());
        while let Some(command) = self.receiver.recv().await {
            self.handle(command).await;

            if self.room.is_empty()
                && self
                    .registry
                    .release(self.room.id(), self.instance, &mut self.receiver)
                    .await
            {
                self.drain().await;
                break;
            }
        }
        tracing::debug!("Coordinator for room '{}' stopped", self.room.id());
    }

    async fn handle(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Join { request, reply } => self.join(request, reply).await,
            RoomCommand::Act {
                name,
                connection,
                action,
            } => {
                if self.room.is_attached(&name, connection) {
                    self.act(name, connection, action).await;
                } else {
                    tracing::debug!(
                        "Ignoring action from stale connection '{}' of '{}'",
                        connection,
                        name
                    );
                }
            }
            RoomCommand::Disconnect { name, connection } => {
                self.pusher.unregister_connection(connection).await;
                if let Some(detached) = self.room.detach(&name, connection) {
                    tracing::info!(
                        "'{}' lost connection to room '{}', holding seat",
                        name,
                        self.room.id()
                    );
                    self.schedule_grace(name, detached.generation);
                    self.deliver(detached.notifications).await;
                }
            }
            RoomCommand::GraceExpired { name, generation } => {
                let notifications = self.room.expire(&name, generation);
                if !notifications.is_empty() {
                    tracing::info!("'{}' did not come back to room '{}'", name, self.room.id());
                }
                self.deliver(notifications).await;
            }
            RoomCommand::RoundTimeout { round } => {
                let notifications = self.room.time_out(round);
                self.deliver(notifications).await;
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.room.snapshot());
            }
        }
    }

    async fn join(&mut self, request: JoinRequest, reply: JoinReply) {
        let now = self.registry.now();
        match self
            .room
            .join(request.name.clone(), request.connection, now)
        {
            Ok(joined) => {
                let JoinRequest {
                    name,
                    connection,
                    channel,
                } = request;
                self.pusher.register_connection(connection, channel).await;
                tracing::info!(
                    "'{}' {} room '{}'",
                    name,
                    if joined.reconnected { "rejoined" } else { "joined" },
                    self.room.id()
                );

                let accepted = JoinAccepted {
                    reconnected: joined.reconnected,
                };
                let mut notifications = joined.notifications;
                if reply.send(Ok(accepted)).is_err() {
                    // The connection gave up waiting.
                    notifications.extend(self.cut_off(connection).await);
                }
                self.deliver(notifications).await;
            }
            Err(error) => {
                tracing::info!("Join to room '{}' rejected: {}", self.room.id(), error);
                let _ = reply.send(Err(JoinRejected { error, request }));
            }
        }
    }

    async fn act(&mut self, name: PlayerName, connection: ConnectionId, action: PlayerAction) {
        let result = match action {
            PlayerAction::Stroke(data) => self.room.relay_stroke(&name, data).map(|n| vec![n]),
            PlayerAction::Guess(text) => self.room.submit_guess(&name, &text),
            PlayerAction::Chat(text) => Ok(self.room.chat(&name, &text)),
            PlayerAction::StartRound => {
                let now = self.registry.now();
                let started = self.room.start_round(self.registry.words(), now);
                if started.is_ok() {
                    if let Some(round) = self.room.round() {
                        tracing::info!(
                            "Round {} started in room '{}', drawer '{}'",
                            round.number,
                            self.room.id(),
                            round.drawer
                        );
                        self.schedule_round_timeout(round.number);
                    }
                }
                started
            }
            PlayerAction::Ping => {
                self.reply(connection, &RoomEvent::Pong).await;
                return;
            }
            PlayerAction::Leave => {
                tracing::info!("'{}' left room '{}'", name, self.room.id());
                let notifications = self.room.leave(&name);
                self.pusher.unregister_connection(connection).await;
                Ok(notifications)
            }
            PlayerAction::Malformed(reason) => Err(RoomError::MalformedMessage(reason)),
        };

        match result {
            Ok(notifications) => self.deliver(notifications).await,
            Err(error) => {
                tracing::debug!("Rejected action from '{}': {}", name, error);
                self.reply(connection, &RoomEvent::Rejected(error)).await;
            }
        }
    }

    /// Fan notifications out in order. A connection that cannot keep up is
    /// cut off on the spot and gets nothing further; whatever its loss
    /// triggers is queued behind the current batch.
    async fn deliver(&mut self, notifications: Vec<Notification>) {
        let mut queue = VecDeque::from(notifications);
        while let Some(notification) = queue.pop_front() {
            let targets = self.room.recipients(&notification.audience);
            let report = self.pusher.broadcast(&targets, &notification.event).await;
            for connection in report.overflowed {
                queue.extend(self.cut_off(connection).await);
            }
        }
    }

    async fn reply(&mut self, connection: ConnectionId, event: &RoomEvent) {
        match self.pusher.push_to(connection, event).await {
            Ok(()) => {}
            Err(MessagePushError::BufferFull(_)) => {
                let notifications = self.cut_off(connection).await;
                self.deliver(notifications).await;
            }
            Err(e) => tracing::debug!("Could not reply to '{}': {}", connection, e),
        }
    }

    /// Treat a connection as lost: drop its channel and start the grace window.
    /// Returns what the room has to announce because of it.
    async fn cut_off(&mut self, connection: ConnectionId) -> Vec<Notification> {
        self.pusher.unregister_connection(connection).await;
        let Some(name) = self.room.name_of(connection).cloned() else {
            return Vec::new();
        };
        match self.room.detach(&name, connection) {
            Some(detached) => {
                tracing::warn!("Cut off slow connection of '{}'", name);
                self.schedule_grace(name, detached.generation);
                detached.notifications
            }
            None => Vec::new(),
        }
    }

    fn schedule_grace(&self, name: PlayerName, generation: u64) {
        let grace = self.registry.config().grace_period;
        self.schedule(grace, RoomCommand::GraceExpired { name, generation });
    }

    fn schedule_round_timeout(&self, round: u64) {
        if let Some(duration) = self.registry.config().round_duration {
            self.schedule(duration, RoomCommand::RoundTimeout { round });
        }
    }

    fn schedule(&self, delay: Duration, command: RoomCommand) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(command);
            }
        });
    }

    /// Answer whatever was queued before the receiver closed.
    async fn drain(&mut self) {
        while let Some(command) = self.receiver.recv().await {
            match command {
                RoomCommand::Join { request, reply } => {
                    let _ = reply.send(Err(JoinRejected {
                        error: RoomError::RoomClosed,
                        request,
                    }));
                }
                RoomCommand::Act { connection, .. } | RoomCommand::Disconnect { connection, .. } => {
                    self.pusher.unregister_connection(connection).await;
                }
                _ => {}
            }
        }
    }
}
