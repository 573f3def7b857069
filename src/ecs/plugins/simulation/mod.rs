use bevy::prelude::*;

use crate::config::ServerConfig;
use crate::ecs::components::*;
use crate::ecs::systems::*;
use crate::sim;

/// Phases of one fixed tick, run strictly in this order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Drain transport queues into Bevy events.
    Inbound,
    /// Spawn, despawn and move commands.
    Lifecycle,
    /// World update and snapshot serialization.
    Simulate,
    /// Hand frames to the transport.
    Outbound,
}

// Simulation plugin: fixed-rate world update and per-tick snapshots
pub struct SimulationPlugin {
    pub config: ServerConfig,
}

impl SimulationPlugin {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self.config.clone();
        let world = sim::World::new(config.world_width, config.world_height);

        app.insert_resource(Simulation(world))
            .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .init_resource::<TickCounter>()
            .init_resource::<OutboundFrames>()
            .add_event::<InputCommandEvent>()
            .add_event::<PlayerSpawnEvent>()
            .add_event::<PlayerDespawnEvent>()
            .configure_sets(
                FixedUpdate,
                (
                    TickSet::Inbound,
                    TickSet::Lifecycle,
                    TickSet::Simulate,
                    TickSet::Outbound,
                )
                    .chain(),
            )
            .add_systems(Startup, cap_tick_backlog_system)
            .add_systems(
                FixedUpdate,
                (
                    (player_spawn_system, player_despawn_system, input_processing_system)
                        .chain()
                        .in_set(TickSet::Lifecycle),
                    (world_tick_system, broadcast_players_system)
                        .chain()
                        .in_set(TickSet::Simulate),
                ),
            );
    }
}
