use bevy::prelude::*;

use crate::sim::{self, ClientCommand, TickReport};

// ============================================================================
// INPUT EVENTS
// ============================================================================

#[derive(Event, Debug, Clone, Copy)]
pub struct InputCommandEvent {
    pub player_id: u32,
    pub command: ClientCommand,
}

// ============================================================================
// PLAYER LIFECYCLE EVENTS
// ============================================================================

#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerSpawnEvent {
    pub player_id: u32,
}

/// Forced removal on disconnect; bypasses the kill path.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDespawnEvent {
    pub player_id: u32,
}

// ============================================================================
// RESOURCES
// ============================================================================

/// The authoritative world, mutated only from the fixed tick.
#[derive(Resource, Deref, DerefMut)]
pub struct Simulation(pub sim::World);

#[derive(Resource, Debug, Default)]
pub struct TickCounter {
    pub ticks: u64,
    pub last_report: TickReport,
}

/// Serialized `players` frames waiting for the transport.
#[derive(Resource, Debug, Default)]
pub struct OutboundFrames {
    pub frames: Vec<String>,
}
