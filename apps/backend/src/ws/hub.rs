use actix::prelude::*;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::domain::state::PlayerId;
use crate::services::game_flow::Outbox;
use crate::ws::protocol::ServerMsg;

/// A serialized server frame on its way to one socket.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct OutboundFrame(pub String);

/// Live websocket connections, keyed by the player id each was given.
#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<PlayerId, Recipient<OutboundFrame>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, player_id: PlayerId, recipient: Recipient<OutboundFrame>) {
        self.connections.insert(player_id, recipient);
    }

    pub fn unregister(&self, player_id: &str) {
        self.connections.remove(player_id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Outbox for WsRegistry {
    fn send(&self, player_id: &str, msg: ServerMsg) {
        let Some(recipient) = self
            .connections
            .get(player_id)
            .map(|entry| entry.value().clone())
        else {
            debug!(player_id, "[WS HUB] no connection for recipient");
            return;
        };
        match serde_json::to_string(&msg) {
            Ok(payload) => recipient.do_send(OutboundFrame(payload)),
            Err(err) => warn!(player_id, error = %err, "[WS HUB] failed to serialize outbound message"),
        }
    }
}
