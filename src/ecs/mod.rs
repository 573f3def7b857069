pub mod components;
pub mod systems;
pub mod plugins;

pub use plugins::{SimulationPlugin, TickSet, WebSocketPlugin};
