use bevy::prelude::*;
use rand::Rng;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::ecs::components::*;
use crate::sim::{self, ClientCommand, EntityId, SimError, WireMessage};

// ============================================================================
// PLAYER MANAGEMENT SYSTEMS
// ============================================================================

pub fn player_spawn_system(
    mut spawn_events: EventReader<PlayerSpawnEvent>,
    mut simulation: ResMut<Simulation>,
    config: Res<ServerConfig>,
) {
    let mut rng = rand::thread_rng();
    let template = config.player;

    for event in spawn_events.read() {
        let x = rng.r#gen::<f32>() * (simulation.width() - template.width);
        let y = rng.r#gen::<f32>() * (simulation.height() - template.height);
        let actor = sim::Entity::actor(
            EntityId(event.player_id),
            x,
            y,
            template.width,
            template.height,
            template.speed,
            template.life,
        )
        .with_tick_rate(config.tick_hz as f32);

        match simulation.add(actor) {
            Ok(()) => info!(player_id = event.player_id, x, y, "🎮 spawned player"),
            Err(error) => warn!(player_id = event.player_id, %error, "player spawn rejected"),
        }
    }
}

pub fn player_despawn_system(
    mut despawn_events: EventReader<PlayerDespawnEvent>,
    mut simulation: ResMut<Simulation>,
) {
    for event in despawn_events.read() {
        if simulation.remove_id(EntityId(event.player_id)).is_some() {
            info!(player_id = event.player_id, "👋 despawned player");
        }
    }
}

// ============================================================================
// INPUT SYSTEMS
// ============================================================================

pub fn input_processing_system(
    mut input_events: EventReader<InputCommandEvent>,
    mut simulation: ResMut<Simulation>,
) {
    for event in input_events.read() {
        let ClientCommand::Move(direction) = event.command;
        match simulation.command(EntityId(event.player_id), direction) {
            Ok(()) => {}
            // the player died or left earlier in this tick
            Err(SimError::UnknownEntity(_)) => {
                debug!(player_id = event.player_id, "move for a player that is gone");
            }
            Err(error) => {
                error!(player_id = event.player_id, %error, "move command failed");
                debug_assert!(false, "move command failed: {error}");
            }
        }
    }
}

// ============================================================================
// TICK SYSTEMS
// ============================================================================

pub fn world_tick_system(mut simulation: ResMut<Simulation>, mut counter: ResMut<TickCounter>) {
    let report = simulation.update();
    for id in &report.removed {
        info!(entity = %id, tick = report.tick, "💀 entity killed");
    }
    counter.ticks += 1;
    counter.last_report = report;
}

/// Serializes a full `players` snapshot of every live entity.
pub fn broadcast_players_system(
    simulation: Res<Simulation>,
    mut outbound: ResMut<OutboundFrames>,
) {
    let frame = WireMessage::players(&simulation.snapshot()).and_then(|message| message.to_json());
    match frame {
        Ok(frame) => outbound.frames.push(frame),
        Err(error) => error!(%error, "failed to serialize players snapshot"),
    }
}

/// Caps virtual time so a stalled frame skips backlog ticks instead of bursting them.
pub fn cap_tick_backlog_system(
    time: Option<ResMut<Time<Virtual>>>,
    config: Res<ServerConfig>,
) {
    if let Some(mut time) = time {
        time.set_max_delta(config.tick_period());
    }
}
