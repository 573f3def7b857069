/*!
# World

Owns the entity collection and the boundary box, and runs the per-tick
update:

1. pick the collidable members, and among them the movable ones
2. `update()` every movable (integration, gravity for actors)
3. clamp every movable into the boundary, one axis at a time
4. for each (movable, other collidable) pair that overlaps, emit every
   matching directional collision event on `other`
5. report what moved and what was removed

The id lists for steps 2-4 are captured once at the start of the tick, so
entities removed by an event handler mid-scan are skipped, never revisited.
*/

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, error};

use super::collection::EntityCollection;
use super::entity::{
    Aabb, Direction, Entity, EntityEvent, EntityId, EventKind, ListenerId, Notify, Outcome,
    Reaction, Solid,
};
use super::error::{SimError, SimResult};

type ListenerFn = Box<dyn FnMut(EntityId, &EntityEvent) + Send + Sync>;

/// External event listeners, invoked when an entity dispatches `Reaction::Listener`.
#[derive(Default)]
struct Listeners {
    next_id: u64,
    registry: HashMap<ListenerId, ListenerFn>,
}

impl Listeners {
    fn register(&mut self, listener: ListenerFn) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registry.insert(id, listener);
        id
    }
}

impl Notify for Listeners {
    fn notify(&mut self, listener: ListenerId, source: EntityId, event: &EntityEvent) {
        if let Some(callback) = self.registry.get_mut(&listener) {
            callback(source, event);
        }
    }
}

/// Summary of one `World::update` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// Movables still present once the tick finished.
    pub moved: Vec<EntityId>,
    /// Entities dropped because they emitted `Kill` during the tick.
    pub removed: Vec<EntityId>,
    /// Overlapping (movable, other) pairs found in the pairwise scan.
    pub collisions: usize,
}

pub struct World {
    boundary: Aabb,
    entities: EntityCollection,
    listeners: Listeners,
    tick: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("boundary", &self.boundary)
            .field("entities", &self.entities.len())
            .field("listeners", &self.listeners.registry.len())
            .field("tick", &self.tick)
            .finish()
    }
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_boundary(Aabb::new(0.0, 0.0, width, height))
    }

    pub fn with_boundary(boundary: Aabb) -> Self {
        Self {
            boundary,
            entities: EntityCollection::new(),
            listeners: Listeners::default(),
            tick: 0,
        }
    }

    pub fn boundary(&self) -> Aabb {
        self.boundary
    }

    pub fn width(&self) -> f32 {
        self.boundary.size.x
    }

    pub fn height(&self) -> f32 {
        self.boundary.size.y
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn entities(&self) -> &EntityCollection {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    fn entity_mut(&mut self, id: EntityId) -> SimResult<&mut Entity> {
        self.entities.get_mut(id).ok_or(SimError::UnknownEntity(id))
    }

    // ------------------------------------------------------------------
    // membership
    // ------------------------------------------------------------------

    /// Attaches `entity` to this world and removes it again once it emits `Kill`.
    pub fn add(&mut self, mut entity: Entity) -> SimResult<()> {
        let id = entity.id();
        if self.entities.contains(id) {
            return Err(SimError::IdConflict(id));
        }
        entity.attach(self.boundary);
        entity.on(EventKind::Kill, Reaction::Detach);
        self.entities.add(entity)
    }

    pub fn remove(&mut self, entity: &Entity) -> Option<Entity> {
        self.remove_id(entity.id())
    }

    /// Forced removal. Does not go through the `Kill` event.
    pub fn remove_id(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.delete_id(id)?;
        entity.detach();
        Some(entity)
    }

    // ------------------------------------------------------------------
    // commands and events
    // ------------------------------------------------------------------

    pub fn command(&mut self, id: EntityId, direction: Direction) -> SimResult<()> {
        self.entity_mut(id)?.move_toward(direction)
    }

    /// Applies damage and returns whether the entity was removed as a result.
    pub fn damage(&mut self, id: EntityId, amount: i32) -> SimResult<bool> {
        let entity = self.entities.get_mut(id).ok_or(SimError::UnknownEntity(id))?;
        let outcome = entity.damage(amount, &mut self.listeners)?;
        Ok(self.settle(id, outcome).is_some())
    }

    /// Emits `event` on entity `id` as if it came from inside the simulation.
    pub fn emit(&mut self, id: EntityId, event: EntityEvent) -> SimResult<bool> {
        let entity = self.entities.get_mut(id).ok_or(SimError::UnknownEntity(id))?;
        let outcome = entity.emit(event, &mut self.listeners);
        Ok(self.settle(id, outcome).is_some())
    }

    /// Subscribes `callback` to `kind` events of entity `id`.
    pub fn listen<F>(&mut self, id: EntityId, kind: EventKind, callback: F) -> SimResult<ListenerId>
    where
        F: FnMut(EntityId, &EntityEvent) + Send + Sync + 'static,
    {
        if !self.entities.contains(id) {
            return Err(SimError::UnknownEntity(id));
        }
        let listener = self.listeners.register(Box::new(callback));
        self.entity_mut(id)?.on(kind, Reaction::Listener(listener));
        Ok(listener)
    }

    pub fn unlisten(&mut self, id: EntityId, kind: EventKind, listener: ListenerId) -> SimResult<()> {
        self.entity_mut(id)?.off(kind, Reaction::Listener(listener));
        self.listeners.registry.remove(&listener);
        Ok(())
    }

    fn settle(&mut self, id: EntityId, outcome: Outcome) -> Option<Entity> {
        if !outcome.detach {
            return None;
        }
        let removed = self.remove_id(id);
        if removed.is_some() {
            debug!(entity = %id, "entity killed, removed from world");
        }
        removed
    }

    // ------------------------------------------------------------------
    // tick
    // ------------------------------------------------------------------

    pub fn update(&mut self) -> TickReport {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        let collidables = self.entities.filter_ids(Entity::is_collidable);
        let movables = self.entities.filter_ids(Entity::is_movable);

        for id in &movables {
            let Some(entity) = self.entities.get_mut(*id) else {
                continue;
            };
            match entity.update(&mut self.listeners) {
                Ok(outcome) => {
                    if self.settle(*id, outcome).is_some() {
                        report.removed.push(*id);
                    }
                }
                Err(error) => {
                    error!(entity = %id, %error, "entity update failed inside tick");
                    debug_assert!(false, "entity update failed inside tick: {error}");
                }
            }
        }

        let boundary = self.boundary;
        for id in &movables {
            if let Some(entity) = self.entities.get_mut(*id) {
                clamp_into(entity, &boundary);
            }
        }

        for movable_id in &movables {
            for other_id in &collidables {
                if other_id == movable_id {
                    continue;
                }
                let Some(movable) = self.entities.get(*movable_id).and_then(Entity::collider) else {
                    break;
                };
                let Some(other) = self.entities.get_mut(*other_id) else {
                    continue;
                };
                let Some(other_collider) = other.collider() else {
                    continue;
                };
                if !other_collider.check_collision(&movable) {
                    continue;
                }

                report.collisions += 1;
                let mut outcome = Outcome::default();
                for direction in other_collider.directions(&movable) {
                    let event = EntityEvent::Collision {
                        direction,
                        solid: Solid::Entity(movable),
                    };
                    outcome = outcome.merge(other.emit(event, &mut self.listeners));
                }
                if self.settle(*other_id, outcome).is_some() {
                    report.removed.push(*other_id);
                }
            }
        }

        report.moved = movables
            .into_iter()
            .filter(|id| self.entities.contains(*id))
            .collect();
        report
    }
}

/// Pulls each edge back inside `boundary`, independently per axis.
fn clamp_into(entity: &mut Entity, boundary: &Aabb) {
    let Some(size) = entity.size() else {
        return;
    };
    let mut position = entity.position();
    if position.x < boundary.left() {
        position.x = boundary.left();
    }
    if position.x + size.x > boundary.right() {
        position.x = boundary.right() - size.x;
    }
    if position.y < boundary.top() {
        position.y = boundary.top();
    }
    if position.y + size.y > boundary.bottom() {
        position.y = boundary.bottom() - size.y;
    }
    entity.set_position(position);
}
