pub mod simulation;
pub mod websocket;

pub use simulation::{SimulationPlugin, TickSet};
pub use websocket::WebSocketPlugin;
