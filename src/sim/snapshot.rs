/*!
# Snapshots and wire messages

Plain serialisable forms of entities and the `{event, args}` envelope every
message on the wire uses.

Server -> client: `players`, args = one snapshot per live entity, every tick.
Client -> server: `move`, args = `[direction]`.
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::collection::EntityCollection;
use super::entity::{Direction, Entity, EntityId};
use super::world::World;

pub const PLAYERS_EVENT: &str = "players";
pub const MOVE_EVENT: &str = "move";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<glam::Vec2> for Point {
    fn from(value: glam::Vec2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

/// Fields beyond `id` and `position` appear only for entities with the matching capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jumping: Option<bool>,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        let size = entity.size();
        Self {
            id: entity.id(),
            position: entity.position().into(),
            width: size.map(|size| size.x),
            height: size.map(|size| size.y),
            speed: entity.speed(),
            velocity: entity.velocity().map(Point::from),
            life: entity.life(),
            jumping: entity.is_actor().then(|| entity.is_jumping()),
        }
    }
}

impl EntityCollection {
    /// One snapshot per entity, in collection order.
    pub fn to_snapshots(&self) -> Vec<EntitySnapshot> {
        self.iter().map(EntitySnapshot::from).collect()
    }
}

impl World {
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entities().to_snapshots()
    }
}

/// Envelope shared by both directions of the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub event: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl WireMessage {
    pub fn players(snapshots: &[EntitySnapshot]) -> serde_json::Result<Self> {
        let args = snapshots
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Self {
            event: PLAYERS_EVENT.to_string(),
            args,
        })
    }

    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Commands a client may send. Anything else on the wire is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Move(Direction),
}

impl ClientCommand {
    pub fn from_message(message: &WireMessage) -> Option<Self> {
        match message.event.as_str() {
            MOVE_EVENT => message
                .args
                .first()
                .and_then(Value::as_str)
                .and_then(Direction::parse)
                .map(ClientCommand::Move),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn actor_snapshot_carries_every_field() {
        let actor = Entity::actor(EntityId(4), 1.5, 2.0, 40.0, 60.0, 10.0, 100);
        let value = serde_json::to_value(EntitySnapshot::from(&actor)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 4,
                "position": {"x": 1.5, "y": 2.0},
                "width": 40.0,
                "height": 60.0,
                "speed": 10.0,
                "velocity": {"x": 0.0, "y": 0.0},
                "life": 100,
                "jumping": false
            })
        );
    }

    #[test]
    fn snapshot_fields_follow_capabilities() {
        let point = Entity::positionable(EntityId(1), 3.0, 4.0);
        assert_eq!(
            serde_json::to_value(EntitySnapshot::from(&point)).unwrap(),
            json!({"id": 1, "position": {"x": 3.0, "y": 4.0}})
        );

        let wall = Entity::collidable(EntityId(2), 0.0, 0.0, 8.0, 2.0);
        let snapshot = EntitySnapshot::from(&wall);
        assert_eq!((snapshot.width, snapshot.height), (Some(8.0), Some(2.0)));
        assert_eq!(snapshot.velocity, None);
        assert_eq!(snapshot.jumping, None);
    }

    #[test]
    fn players_message_wraps_snapshots_in_order() {
        let mut world = World::new(1024.0, 576.0);
        world
            .add(Entity::actor(EntityId(2), 0.0, 0.0, 40.0, 60.0, 10.0, 100))
            .unwrap();
        world
            .add(Entity::actor(EntityId(1), 100.0, 0.0, 40.0, 60.0, 10.0, 100))
            .unwrap();

        let message = WireMessage::players(&world.snapshot()).unwrap();
        assert_eq!(message.event, "players");
        let ids: Vec<_> = message.args.iter().map(|arg| arg["id"].clone()).collect();
        assert_eq!(ids, vec![json!(2), json!(1)]);

        let text = message.to_json().unwrap();
        assert!(text.starts_with(r#"{"event":"players","args":["#));
    }

    #[test]
    fn only_known_move_directions_become_commands() {
        let parse = |text: &str| ClientCommand::from_message(&WireMessage::parse(text).unwrap());

        assert_eq!(
            parse(r#"{"event":"move","args":["left"]}"#),
            Some(ClientCommand::Move(Direction::Left))
        );
        assert_eq!(parse(r#"{"event":"move","args":["sideways"]}"#), None);
        assert_eq!(parse(r#"{"event":"move","args":[3]}"#), None);
        assert_eq!(parse(r#"{"event":"move","args":[]}"#), None);
        assert_eq!(parse(r#"{"event":"chat","args":["up"]}"#), None);
        assert!(WireMessage::parse("not json").is_err());
    }
}
