use bevy::prelude::*;
use crossbeam_channel::Receiver;
use tokio::sync::mpsc;

use crate::sim::ClientCommand;

// Messages from WebSocket to ECS
#[derive(Debug, Clone)]
pub enum WebSocketMessage {
    PlayerJoined(u32),
    PlayerLeft(u32),
    PlayerInput(u32, ClientCommand),
    /// The listener could not be started; the server cannot accept players.
    ServerStopped,
}

// WebSocket connection resource (ECS side of the channels)
#[derive(Resource)]
pub struct WebSocketConnections {
    pub incoming_messages: Receiver<WebSocketMessage>,
    pub frame_sender: mpsc::Sender<String>,
}
