use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use platformer_server::config::ServerConfig;
use platformer_server::ecs::{SimulationPlugin, WebSocketPlugin};

/// Main entry point for the game server.
///
/// Reads the configuration from the environment, then runs the fixed-tick
/// simulation until the process is stopped or the listener fails.
fn main() -> AppExit {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "invalid server configuration");
            return AppExit::error();
        }
    };

    info!("🚀 Starting platformer server...");
    info!(
        addr = %config.bind_addr(),
        tick_hz = config.tick_hz,
        world_width = config.world_width,
        world_height = config.world_height,
        "server configuration"
    );

    App::new()
        // Bevy's minimal plugins (no graphics/audio needed for server)
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(config.tick_period())))
        .add_plugins(SimulationPlugin::new(config.clone()))
        .add_plugins(WebSocketPlugin::new(&config))
        .run()
}
