use bevy::prelude::*;
use crossbeam_channel::Sender;
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use super::components::*;
use crate::ecs::components::*;
use crate::sim::{ClientCommand, WireMessage};

type ConnectionMap = Arc<Mutex<HashMap<u32, mpsc::Sender<Message>>>>;

static NEXT_PLAYER_ID: AtomicU32 = AtomicU32::new(1);

/// Player ids are never reused within a process.
pub fn generate_player_id() -> u32 {
    NEXT_PLAYER_ID.fetch_add(1, Ordering::SeqCst)
}

// Run the WebSocket server in a dedicated thread with its own async runtime
pub fn spawn_websocket_server(
    addr: String,
    client_buffer: usize,
    message_sender: Sender<WebSocketMessage>,
    frames: mpsc::Receiver<String>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(error) => {
                error!(%error, "failed to build network runtime");
                let _ = message_sender.send(WebSocketMessage::ServerStopped);
                return;
            }
        };

        runtime.block_on(async move {
            let listener = match TcpListener::bind(&addr).await {
                Ok(listener) => listener,
                Err(error) => {
                    error!(%addr, %error, "failed to bind WebSocket listener");
                    let _ = message_sender.send(WebSocketMessage::ServerStopped);
                    return;
                }
            };
            info!("🌐 WebSocket server listening on ws://{}", addr);

            let connections: ConnectionMap = Arc::new(Mutex::new(HashMap::new()));
            tokio::spawn(broadcast_frames(frames, connections.clone()));

            loop {
                match listener.accept().await {
                    Ok((stream, peer)) => {
                        debug!(%peer, "📡 new connection");
                        tokio::spawn(handle_client(
                            stream,
                            peer,
                            connections.clone(),
                            message_sender.clone(),
                            client_buffer,
                        ));
                    }
                    Err(error) => warn!(%error, "failed to accept connection"),
                }
            }
        });
    });
}

// Fan every frame out to all clients without ever waiting on one of them
async fn broadcast_frames(mut frames: mpsc::Receiver<String>, connections: ConnectionMap) {
    while let Some(frame) = frames.recv().await {
        let message = Message::text(frame);
        let mut conns = connections.lock().await;
        conns.retain(|player_id, sender| match sender.try_send(message.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(player_id = *player_id, "client is lagging, frame dropped");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        });
    }
}

// Handle individual WebSocket client
async fn handle_client(
    stream: TcpStream,
    peer: SocketAddr,
    connections: ConnectionMap,
    message_sender: Sender<WebSocketMessage>,
    client_buffer: usize,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(error) => {
            warn!(%peer, %error, "❌ WebSocket handshake failed");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<Message>(client_buffer);
    let player_id = generate_player_id();
    connections.lock().await.insert(player_id, tx.clone());

    info!(player_id, %peer, "✅ player connected");
    let _ = message_sender.send(WebSocketMessage::PlayerJoined(player_id));

    // Outgoing messages for this client only
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => handle_input_message(player_id, text.as_str(), &message_sender),
            Ok(Message::Ping(data)) => {
                let _ = tx.try_send(Message::Pong(data));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                debug!(player_id, %error, "connection error");
                break;
            }
        }
    }

    connections.lock().await.remove(&player_id);
    writer.abort();
    let _ = message_sender.send(WebSocketMessage::PlayerLeft(player_id));
    info!(player_id, "🔌 player disconnected");
}

// Parse `{event, args}` frames; anything that is not a valid move is ignored
fn handle_input_message(player_id: u32, text: &str, message_sender: &Sender<WebSocketMessage>) {
    let command = WireMessage::parse(text)
        .ok()
        .as_ref()
        .and_then(ClientCommand::from_message);
    match command {
        Some(command) => {
            let _ = message_sender.send(WebSocketMessage::PlayerInput(player_id, command));
        }
        None => debug!(player_id, text, "ignored client message"),
    }
}

// Drain the transport queue into ECS events at the start of the tick
pub fn handle_websocket_messages(
    mut input_events: EventWriter<InputCommandEvent>,
    mut spawn_events: EventWriter<PlayerSpawnEvent>,
    mut despawn_events: EventWriter<PlayerDespawnEvent>,
    mut exit: EventWriter<AppExit>,
    connections: Res<WebSocketConnections>,
) {
    while let Ok(message) = connections.incoming_messages.try_recv() {
        match message {
            WebSocketMessage::PlayerJoined(player_id) => {
                spawn_events.send(PlayerSpawnEvent { player_id });
            }
            WebSocketMessage::PlayerLeft(player_id) => {
                despawn_events.send(PlayerDespawnEvent { player_id });
            }
            WebSocketMessage::PlayerInput(player_id, command) => {
                input_events.send(InputCommandEvent { player_id, command });
            }
            WebSocketMessage::ServerStopped => {
                exit.send(AppExit::error());
            }
        }
    }
}

// Hand serialized frames to the broadcaster; never blocks the tick
pub fn send_network_updates(
    mut outbound: ResMut<OutboundFrames>,
    connections: Res<WebSocketConnections>,
) {
    for frame in outbound.frames.drain(..) {
        match connections.frame_sender.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("broadcaster is behind, snapshot dropped"),
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
