pub mod components;
pub mod systems;

use bevy::prelude::*;
use components::WebSocketConnections;
use systems::{handle_websocket_messages, send_network_updates, spawn_websocket_server};

use crate::config::ServerConfig;
use crate::ecs::plugins::simulation::TickSet;

/// Frames buffered between the tick and the broadcaster task.
const FRAME_QUEUE: usize = 8;

// WebSocket plugin
pub struct WebSocketPlugin {
    pub addr: String,
    pub client_buffer: usize,
}

impl WebSocketPlugin {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            addr: config.bind_addr(),
            client_buffer: config.client_buffer,
        }
    }
}

impl Default for WebSocketPlugin {
    fn default() -> Self {
        Self::new(&ServerConfig::default())
    }
}

impl Plugin for WebSocketPlugin {
    fn build(&self, app: &mut App) {
        let (inbound_tx, inbound_rx) = crossbeam_channel::unbounded();
        let (frame_tx, frame_rx) = tokio::sync::mpsc::channel(FRAME_QUEUE);

        app.insert_resource(WebSocketConnections {
            incoming_messages: inbound_rx,
            frame_sender: frame_tx,
        })
        .add_systems(
            FixedUpdate,
            (
                handle_websocket_messages.in_set(TickSet::Inbound),
                send_network_updates.in_set(TickSet::Outbound),
            ),
        );

        spawn_websocket_server(self.addr.clone(), self.client_buffer, inbound_tx, frame_rx);
    }
}
