/*!
# Simulation Core

Authoritative, engine-agnostic game state: entities with an event bus each,
the world that owns them, and the snapshot types broadcast every tick.
Nothing in here knows about Bevy or sockets.
*/

pub mod collection;
pub mod entity;
pub mod error;
pub mod event_bus;
pub mod snapshot;
pub mod world;

pub use collection::EntityCollection;
pub use entity::{
    Aabb, Capability, Collider, Direction, Entity, EntityEvent, EntityId, EventKind, ListenerId,
    Outcome, Reaction, Solid, GRAVITY,
};
pub use error::{SimError, SimResult};
pub use event_bus::EventBus;
pub use snapshot::{ClientCommand, EntitySnapshot, Point, WireMessage};
pub use world::{TickReport, World};
