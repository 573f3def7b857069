/*!
# Entities

One entity record with optional components instead of a class chain:

| capability  | components present        | adds                                   |
|-------------|---------------------------|----------------------------------------|
| Positionable| (always)                  | `id`, `position`, event bus            |
| Collidable  | `Body`                    | size, directional overlap predicates   |
| Movable     | `Body` + `Motion`         | speed, velocity, integration, commands |
| Actor       | `Body` + `Motion` + actor | life, jump / gravity state machine     |

Callers query a capability (`collider()`, `is_movable()`, ...) rather than
inspecting a concrete type.
*/

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};
use super::event_bus::EventBus;

/// Downward acceleration added to an airborne actor every tick.
pub const GRAVITY: f32 = 0.5;

/// Tick rate assumed when converting the jump budget to ticks, unless the
/// actor is built with [`Entity::with_tick_rate`].
pub const DEFAULT_TICK_HZ: f32 = 60.0;

// ============================================================================
// IDENTIFIERS AND EVENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for an external listener registered through the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Parses a wire direction. Anything unrecognised yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    UpCollision,
    DownCollision,
    LeftCollision,
    RightCollision,
    Kill,
}

impl EventKind {
    pub fn collision(direction: Direction) -> Self {
        match direction {
            Direction::Up => EventKind::UpCollision,
            Direction::Down => EventKind::DownCollision,
            Direction::Left => EventKind::LeftCollision,
            Direction::Right => EventKind::RightCollision,
        }
    }
}

/// What an entity collided with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solid {
    /// The boundary of the owning world (the floor, for landings).
    World(Aabb),
    Entity(Collider),
}

impl Solid {
    pub fn aabb(&self) -> Aabb {
        match self {
            Solid::World(aabb) => *aabb,
            Solid::Entity(collider) => collider.aabb,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityEvent {
    Collision { direction: Direction, solid: Solid },
    Kill,
}

impl EntityEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EntityEvent::Collision { direction, .. } => EventKind::collision(*direction),
            EntityEvent::Kill => EventKind::Kill,
        }
    }
}

/// Handler values stored in an entity's event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    /// Reset vertical motion and jump state (actor landing).
    Land,
    /// Ask the owning world to drop this entity.
    Detach,
    /// Forward the event to an external listener held by the world.
    Listener(ListenerId),
}

/// Receiver for `Reaction::Listener` dispatches.
pub trait Notify {
    fn notify(&mut self, listener: ListenerId, source: EntityId, event: &EntityEvent);
}

impl<F> Notify for F
where
    F: FnMut(ListenerId, EntityId, &EntityEvent),
{
    fn notify(&mut self, listener: ListenerId, source: EntityId, event: &EntityEvent) {
        self(listener, source, event)
    }
}

/// Side effects of an emit that the owner of the entity has to apply.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub detach: bool,
}

impl Outcome {
    pub fn merge(self, other: Outcome) -> Outcome {
        Outcome {
            detach: self.detach || other.detach,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Collidable,
    Movable,
    Actor,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Collidable => "collidable",
            Capability::Movable => "movable",
            Capability::Actor => "actor",
        };
        f.write_str(name)
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Axis-aligned box: top-left corner plus extent, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub position: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    fn overlaps_y(&self, other: &Aabb) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }
}

/// The collidable view of an entity: identity plus its current box.
///
/// Each directional predicate tests a different combination of edge
/// comparisons. They are neither exclusive nor symmetric, and `up` skips the
/// lower-bound y test the others keep. Overlap (`check_collision`) implies
/// all four.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub id: EntityId,
    pub aabb: Aabb,
}

impl Collider {
    /// x-overlap and `self.bottom > other.top`.
    pub fn up_collision(&self, other: &Collider) -> bool {
        self.id != other.id
            && self.aabb.overlaps_x(&other.aabb)
            && self.aabb.bottom() > other.aabb.top()
    }

    /// x-overlap and `self.top < other.bottom`.
    pub fn down_collision(&self, other: &Collider) -> bool {
        self.id != other.id
            && self.aabb.overlaps_x(&other.aabb)
            && self.aabb.top() < other.aabb.bottom()
    }

    /// y-overlap and `self.right > other.left`.
    pub fn left_collision(&self, other: &Collider) -> bool {
        self.id != other.id
            && self.aabb.overlaps_y(&other.aabb)
            && self.aabb.right() > other.aabb.left()
    }

    /// y-overlap and `self.left < other.right`.
    pub fn right_collision(&self, other: &Collider) -> bool {
        self.id != other.id
            && self.aabb.overlaps_y(&other.aabb)
            && self.aabb.left() < other.aabb.right()
    }

    /// Strict overlap on both axes.
    pub fn check_collision(&self, other: &Collider) -> bool {
        self.id != other.id && self.aabb.overlaps_x(&other.aabb) && self.aabb.overlaps_y(&other.aabb)
    }

    pub fn collides_toward(&self, direction: Direction, other: &Collider) -> bool {
        match direction {
            Direction::Up => self.up_collision(other),
            Direction::Down => self.down_collision(other),
            Direction::Left => self.left_collision(other),
            Direction::Right => self.right_collision(other),
        }
    }

    /// Directions (up, down, left, right order) in which `self` collides with `other`.
    pub fn directions(&self, other: &Collider) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.collides_toward(*direction, other))
            .collect()
    }
}

// ============================================================================
// COMPONENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Body {
    width: f32,
    height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    speed: f32,
    velocity: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActorState {
    life: i32,
    jumping: bool,
    gravity_velocity: f32,
    gravity_enabled: bool,
    jump_duration_ms: f32,
    jump_ticks: u32,
    // ticks left before gravity re-engages after a jump
    gravity_resume_in: Option<u32>,
}

// saturating cast: a zero speed never re-engages gravity by timer
fn jump_ticks(jump_duration_ms: f32, tick_hz: f32) -> u32 {
    ((jump_duration_ms * tick_hz / 1000.0).ceil() as u32).max(1)
}

impl ActorState {
    fn new(life: i32, height: f32, speed: f32) -> Self {
        let jump_duration_ms = height / speed * 60.0;
        Self {
            life,
            jumping: false,
            gravity_velocity: 0.0,
            gravity_enabled: true,
            jump_duration_ms,
            jump_ticks: jump_ticks(jump_duration_ms, DEFAULT_TICK_HZ),
            gravity_resume_in: None,
        }
    }

    fn start_jump(&mut self) {
        self.jumping = true;
        self.gravity_enabled = false;
        self.gravity_resume_in = Some(self.jump_ticks);
    }

    fn advance_jump_timer(&mut self) {
        match self.gravity_resume_in {
            Some(remaining) if remaining > 1 => self.gravity_resume_in = Some(remaining - 1),
            Some(_) => {
                self.gravity_enabled = true;
                self.gravity_velocity = 0.0;
                self.gravity_resume_in = None;
            }
            None => {}
        }
    }

    fn touch_down(&mut self) {
        self.jumping = false;
        self.gravity_enabled = true;
        self.gravity_velocity = 0.0;
        self.gravity_resume_in = None;
    }
}

// ============================================================================
// ENTITY
// ============================================================================

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    position: Vec2,
    body: Option<Body>,
    motion: Option<Motion>,
    actor: Option<ActorState>,
    events: EventBus<EventKind, Reaction>,
    // boundary of the owning world; set on add, cleared on removal
    world: Option<Aabb>,
}

impl Entity {
    pub fn positionable(id: EntityId, x: f32, y: f32) -> Self {
        Self {
            id,
            position: Vec2::new(x, y),
            body: None,
            motion: None,
            actor: None,
            events: EventBus::new(),
            world: None,
        }
    }

    pub fn collidable(id: EntityId, x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "entity {id} has an empty body");
        Self {
            body: Some(Body { width, height }),
            ..Self::positionable(id, x, y)
        }
    }

    pub fn movable(id: EntityId, x: f32, y: f32, width: f32, height: f32, speed: f32) -> Self {
        debug_assert!(speed >= 0.0, "entity {id} has a negative speed");
        Self {
            motion: Some(Motion {
                speed,
                velocity: Vec2::ZERO,
            }),
            ..Self::collidable(id, x, y, width, height)
        }
    }

    /// An actor lands (resets its jump state) whenever it receives `UpCollision`.
    pub fn actor(
        id: EntityId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        speed: f32,
        life: i32,
    ) -> Self {
        let mut entity = Self::movable(id, x, y, width, height, speed);
        entity.actor = Some(ActorState::new(life, height, speed));
        entity.events.on(EventKind::UpCollision, Reaction::Land);
        entity
    }

    /// Converts the actor's jump budget at the rate the world actually ticks,
    /// so the jump lasts the same wall time at any `tick_hz`.
    pub fn with_tick_rate(mut self, tick_hz: f32) -> Self {
        if let Some(actor) = self.actor.as_mut() {
            actor.jump_ticks = jump_ticks(actor.jump_duration_ms, tick_hz);
        }
        self
    }

    // ------------------------------------------------------------------
    // capability queries and accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn is_collidable(&self) -> bool {
        self.body.is_some()
    }

    pub fn is_movable(&self) -> bool {
        self.body.is_some() && self.motion.is_some()
    }

    pub fn is_actor(&self) -> bool {
        self.actor.is_some()
    }

    pub fn size(&self) -> Option<Vec2> {
        self.body.map(|body| Vec2::new(body.width, body.height))
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.body.map(|body| Aabb {
            position: self.position,
            size: Vec2::new(body.width, body.height),
        })
    }

    pub fn collider(&self) -> Option<Collider> {
        self.bounds().map(|aabb| Collider { id: self.id, aabb })
    }

    pub fn speed(&self) -> Option<f32> {
        self.motion.map(|motion| motion.speed)
    }

    pub fn velocity(&self) -> Option<Vec2> {
        self.motion.map(|motion| motion.velocity)
    }

    pub fn life(&self) -> Option<i32> {
        self.actor.map(|actor| actor.life)
    }

    pub fn is_jumping(&self) -> bool {
        self.actor.is_some_and(|actor| actor.jumping)
    }

    pub fn gravity_enabled(&self) -> bool {
        self.actor.is_some_and(|actor| actor.gravity_enabled)
    }

    pub fn gravity_velocity(&self) -> Option<f32> {
        self.actor.map(|actor| actor.gravity_velocity)
    }

    /// Jump budget in milliseconds, `height / speed * 60`.
    pub fn jump_duration_ms(&self) -> Option<f32> {
        self.actor.map(|actor| actor.jump_duration_ms)
    }

    /// Jump budget converted to ticks at the actor's tick rate.
    pub fn jump_ticks(&self) -> Option<u32> {
        self.actor.map(|actor| actor.jump_ticks)
    }

    pub fn is_attached(&self) -> bool {
        self.world.is_some()
    }

    pub fn world_bounds(&self) -> Option<Aabb> {
        self.world
    }

    pub(crate) fn attach(&mut self, boundary: Aabb) {
        self.world = Some(boundary);
    }

    pub(crate) fn detach(&mut self) {
        self.world = None;
        self.events.off(&EventKind::Kill, &Reaction::Detach);
    }

    // ------------------------------------------------------------------
    // collision predicates (evaluated from `self` against `other`)
    // ------------------------------------------------------------------

    fn pair_with(&self, other: &Entity) -> Option<(Collider, Collider)> {
        Some((self.collider()?, other.collider()?))
    }

    pub fn up_collision(&self, other: &Entity) -> bool {
        self.pair_with(other).is_some_and(|(a, b)| a.up_collision(&b))
    }

    pub fn down_collision(&self, other: &Entity) -> bool {
        self.pair_with(other).is_some_and(|(a, b)| a.down_collision(&b))
    }

    pub fn left_collision(&self, other: &Entity) -> bool {
        self.pair_with(other).is_some_and(|(a, b)| a.left_collision(&b))
    }

    pub fn right_collision(&self, other: &Entity) -> bool {
        self.pair_with(other).is_some_and(|(a, b)| a.right_collision(&b))
    }

    pub fn check_collision(&self, other: &Entity) -> bool {
        self.pair_with(other).is_some_and(|(a, b)| a.check_collision(&b))
    }

    // ------------------------------------------------------------------
    // events
    // ------------------------------------------------------------------

    pub fn on(&mut self, kind: EventKind, reaction: Reaction) -> &mut Self {
        self.events.on(kind, reaction);
        self
    }

    pub fn off(&mut self, kind: EventKind, reaction: Reaction) -> &mut Self {
        self.events.off(&kind, &reaction);
        self
    }

    pub fn is_subscribed(&self, kind: EventKind, reaction: Reaction) -> bool {
        self.events.is_subscribed(&kind, &reaction)
    }

    /// Runs every reaction registered for the event's kind, in order.
    pub fn emit(&mut self, event: EntityEvent, notify: &mut impl Notify) -> Outcome {
        let mut outcome = Outcome::default();
        let Self {
            id,
            position,
            body,
            motion,
            actor,
            events,
            ..
        } = self;

        events.emit(&event.kind(), |reaction| match reaction {
            Reaction::Land => {
                if let (EntityEvent::Collision { solid: Solid::World(floor), .. }, Some(body)) =
                    (&event, body.as_ref())
                {
                    position.y = floor.bottom() - body.height;
                }
                if let Some(motion) = motion.as_mut() {
                    motion.velocity.y = 0.0;
                }
                if let Some(actor) = actor.as_mut() {
                    actor.touch_down();
                }
            }
            Reaction::Detach => outcome.detach = true,
            Reaction::Listener(listener) => notify.notify(listener, *id, &event),
        });
        outcome
    }

    // ------------------------------------------------------------------
    // movement
    // ------------------------------------------------------------------

    fn ensure_attached(&self) -> SimResult<()> {
        if self.world.is_some() {
            Ok(())
        } else {
            Err(SimError::NotAttached(self.id))
        }
    }

    fn motion_mut(&mut self) -> SimResult<&mut Motion> {
        let id = self.id;
        self.motion.as_mut().ok_or(SimError::MissingCapability {
            id,
            capability: Capability::Movable,
        })
    }

    pub fn move_toward(&mut self, direction: Direction) -> SimResult<()> {
        match direction {
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
        }
    }

    /// Plain movables head up at full speed. Actors jump, unless already jumping.
    pub fn move_up(&mut self) -> SimResult<()> {
        self.ensure_attached()?;
        let already_jumping = self.is_jumping();
        let motion = self.motion_mut()?;
        if already_jumping {
            return Ok(());
        }
        motion.velocity.y = -motion.speed;
        if let Some(actor) = self.actor.as_mut() {
            actor.start_jump();
        }
        Ok(())
    }

    pub fn move_down(&mut self) -> SimResult<()> {
        self.ensure_attached()?;
        let motion = self.motion_mut()?;
        motion.velocity.y = motion.speed;
        Ok(())
    }

    pub fn move_left(&mut self) -> SimResult<()> {
        self.ensure_attached()?;
        let motion = self.motion_mut()?;
        motion.velocity.x = -motion.speed;
        Ok(())
    }

    pub fn move_right(&mut self) -> SimResult<()> {
        self.ensure_attached()?;
        let motion = self.motion_mut()?;
        motion.velocity.x = motion.speed;
        Ok(())
    }

    /// Clears velocity. Actors keep their vertical component, which belongs
    /// to the jump/gravity state machine and is cleared by landing.
    ///
    /// This holds for falling actors too, not only jumping ones, so a fall
    /// accumulates `velocity.y` tick over tick instead of moving by the
    /// current gravity velocity alone.
    pub fn stop(&mut self) {
        let keep_vertical = self.actor.is_some();
        if let Some(motion) = self.motion.as_mut() {
            motion.velocity.x = 0.0;
            if !keep_vertical {
                motion.velocity.y = 0.0;
            }
        }
    }

    /// Advances the entity by one tick.
    ///
    /// Positionables and static collidables do nothing. Movables integrate
    /// their velocity and stop. Actors additionally apply gravity first and,
    /// once their bottom edge reaches the world floor, emit `UpCollision`
    /// against the world to themselves.
    pub fn update(&mut self, notify: &mut impl Notify) -> SimResult<Outcome> {
        let Some(mut motion) = self.motion else {
            return Ok(Outcome::default());
        };

        let floor = match self.actor.as_mut() {
            Some(actor) => {
                let boundary = self.world.ok_or(SimError::NotAttached(self.id))?;
                if actor.gravity_enabled {
                    actor.gravity_velocity += GRAVITY;
                    motion.velocity.y += actor.gravity_velocity;
                }
                Some(boundary)
            }
            None => None,
        };

        self.position += motion.velocity;
        self.motion = Some(motion);
        self.stop();
        if let Some(actor) = self.actor.as_mut() {
            actor.advance_jump_timer();
        }

        let (Some(floor), Some(body)) = (floor, self.body) else {
            return Ok(Outcome::default());
        };
        if self.position.y + body.height >= floor.bottom() {
            let landing = EntityEvent::Collision {
                direction: Direction::Up,
                solid: Solid::World(floor),
            };
            return Ok(self.emit(landing, notify));
        }
        Ok(Outcome::default())
    }

    /// Subtracts `amount` from life; emits `Kill` once life drops to zero or below.
    pub fn damage(&mut self, amount: i32, notify: &mut impl Notify) -> SimResult<Outcome> {
        self.ensure_attached()?;
        let id = self.id;
        let actor = self.actor.as_mut().ok_or(SimError::MissingCapability {
            id,
            capability: Capability::Actor,
        })?;
        if amount <= 0 {
            return Ok(Outcome::default());
        }
        actor.life = actor.life.saturating_sub(amount);
        if actor.life <= 0 {
            return Ok(self.emit(EntityEvent::Kill, notify));
        }
        Ok(Outcome::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet(_: ListenerId, _: EntityId, _: &EntityEvent) {}

    fn boundary() -> Aabb {
        Aabb::new(0.0, 0.0, 1024.0, 576.0)
    }

    fn attached_actor(x: f32, y: f32) -> Entity {
        let mut actor = Entity::actor(EntityId(1), x, y, 40.0, 60.0, 10.0, 100);
        actor.attach(boundary());
        actor
    }

    fn collider(id: u32, x: f32, y: f32, w: f32, h: f32) -> Collider {
        Collider {
            id: EntityId(id),
            aabb: Aabb::new(x, y, w, h),
        }
    }

    #[test]
    fn direction_parsing_ignores_unknown_values() {
        assert_eq!(Direction::parse("left"), Some(Direction::Left));
        assert_eq!(Direction::parse("LEFT"), None);
        assert_eq!(Direction::parse("jump"), None);
    }

    #[test]
    fn predicates_reject_self_and_non_collidables() {
        let a = Entity::collidable(EntityId(1), 0.0, 0.0, 10.0, 10.0);
        let same_id = Entity::collidable(EntityId(1), 5.0, 5.0, 10.0, 10.0);
        let point = Entity::positionable(EntityId(2), 5.0, 5.0);

        assert!(!a.check_collision(&a));
        assert!(!a.check_collision(&same_id));
        assert!(!a.up_collision(&point));
        assert!(!a.left_collision(&point));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = collider(1, 0.0, 0.0, 10.0, 10.0);
        let beside = collider(2, 10.0, 0.0, 10.0, 10.0);
        let below = collider(3, 0.0, 10.0, 10.0, 10.0);
        assert!(!a.check_collision(&beside));
        assert!(!a.check_collision(&below));
    }

    #[test]
    fn up_collision_has_no_lower_bound_on_y() {
        // `other` sits far above `self` with x-overlap and no y-overlap
        // yet `up` still fires.
        let a = collider(1, 0.0, 100.0, 10.0, 10.0);
        let far_above = collider(2, 0.0, 0.0, 10.0, 10.0);
        assert!(a.up_collision(&far_above));
        assert!(!a.down_collision(&far_above));
        assert!(!a.check_collision(&far_above));

        // far below: `down` fires but `up` does not
        let far_below = collider(3, 0.0, 300.0, 10.0, 10.0);
        assert!(!a.up_collision(&far_below));
        assert!(a.down_collision(&far_below));
    }

    #[test]
    fn left_and_right_use_one_sided_x_tests() {
        let a = collider(1, 100.0, 0.0, 10.0, 10.0);
        let far_right = collider(2, 300.0, 0.0, 10.0, 10.0);
        let far_left = collider(3, 0.0, 0.0, 10.0, 10.0);

        assert!(!a.left_collision(&far_right));
        assert!(a.right_collision(&far_right));
        assert!(a.left_collision(&far_left));
        assert!(!a.right_collision(&far_left));
    }

    // Each directional test is one strict overlap on the cross axis plus one
    // strict one-sided edge comparison. Touching (equality) never counts.

    #[test]
    fn up_boundary_is_strict() {
        let a = collider(1, 0.0, 0.0, 10.0, 10.0);
        // a.bottom == other.top
        assert!(!a.up_collision(&collider(2, 0.0, 10.0, 10.0, 10.0)));
        assert!(a.up_collision(&collider(2, 0.0, 9.5, 10.0, 10.0)));
        // x edges only touch
        assert!(!a.up_collision(&collider(2, 10.0, 5.0, 10.0, 10.0)));
        assert!(!a.up_collision(&collider(2, -10.0, 5.0, 10.0, 10.0)));
        assert!(a.up_collision(&collider(2, 9.5, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn down_boundary_is_strict() {
        let a = collider(1, 0.0, 0.0, 10.0, 10.0);
        // a.top == other.bottom
        assert!(!a.down_collision(&collider(2, 0.0, -10.0, 10.0, 10.0)));
        assert!(a.down_collision(&collider(2, 0.0, -9.5, 10.0, 10.0)));
        assert!(!a.down_collision(&collider(2, 10.0, -9.5, 10.0, 10.0)));
        assert!(!a.down_collision(&collider(2, -10.0, -9.5, 10.0, 10.0)));
        assert!(a.down_collision(&collider(2, -9.5, -9.5, 10.0, 10.0)));
    }

    #[test]
    fn left_boundary_is_strict() {
        let a = collider(1, 0.0, 0.0, 10.0, 10.0);
        // a.right == other.left
        assert!(!a.left_collision(&collider(2, 10.0, 0.0, 10.0, 10.0)));
        assert!(a.left_collision(&collider(2, 9.5, 0.0, 10.0, 10.0)));
        // y edges only touch
        assert!(!a.left_collision(&collider(2, 9.5, 10.0, 10.0, 10.0)));
        assert!(!a.left_collision(&collider(2, 9.5, -10.0, 10.0, 10.0)));
        assert!(a.left_collision(&collider(2, 9.5, 9.5, 10.0, 10.0)));
    }

    #[test]
    fn right_boundary_is_strict() {
        let a = collider(1, 0.0, 0.0, 10.0, 10.0);
        // a.left == other.right
        assert!(!a.right_collision(&collider(2, -10.0, 0.0, 10.0, 10.0)));
        assert!(a.right_collision(&collider(2, -9.5, 0.0, 10.0, 10.0)));
        assert!(!a.right_collision(&collider(2, -9.5, 10.0, 10.0, 10.0)));
        assert!(!a.right_collision(&collider(2, -9.5, -10.0, 10.0, 10.0)));
        assert!(a.right_collision(&collider(2, -9.5, -9.5, 10.0, 10.0)));
    }

    #[test]
    fn overlap_implies_every_direction() {
        let a = collider(1, 0.0, 0.0, 10.0, 10.0);
        let b = collider(2, 5.0, 5.0, 10.0, 10.0);
        assert!(a.check_collision(&b));
        assert_eq!(a.directions(&b), Direction::ALL.to_vec());
        assert_eq!(b.directions(&a), Direction::ALL.to_vec());
    }

    #[test]
    fn movable_update_integrates_then_stops() {
        let mut entity = Entity::movable(EntityId(7), 10.0, 10.0, 5.0, 5.0, 3.0);
        entity.attach(boundary());
        entity.move_right().unwrap();
        entity.move_down().unwrap();
        entity.move_left().unwrap();

        let outcome = entity.update(&mut quiet).unwrap();
        assert_eq!(outcome, Outcome::default());
        assert_eq!(entity.position(), Vec2::new(7.0, 13.0));
        assert_eq!(entity.velocity(), Some(Vec2::ZERO));

        entity.update(&mut quiet).unwrap();
        assert_eq!(entity.position(), Vec2::new(7.0, 13.0));
    }

    #[test]
    fn commands_require_attachment_and_motion() {
        let mut loose = Entity::actor(EntityId(3), 0.0, 0.0, 10.0, 10.0, 1.0, 5);
        assert_eq!(loose.move_left(), Err(SimError::NotAttached(EntityId(3))));
        assert_eq!(
            loose.damage(1, &mut quiet),
            Err(SimError::NotAttached(EntityId(3)))
        );

        let mut wall = Entity::collidable(EntityId(4), 0.0, 0.0, 10.0, 10.0);
        wall.attach(boundary());
        assert_eq!(
            wall.move_up(),
            Err(SimError::MissingCapability {
                id: EntityId(4),
                capability: Capability::Movable
            })
        );
    }

    #[test]
    fn actor_derives_jump_duration() {
        let actor = attached_actor(0.0, 0.0);
        assert_eq!(actor.jump_duration_ms(), Some(360.0));
        assert_eq!(actor.jump_ticks(), Some(22));
        assert!(actor.is_subscribed(EventKind::UpCollision, Reaction::Land));
    }

    #[test]
    fn jump_ticks_follow_the_tick_rate() {
        let slow = attached_actor(0.0, 0.0).with_tick_rate(30.0);
        assert_eq!(slow.jump_duration_ms(), Some(360.0));
        assert_eq!(slow.jump_ticks(), Some(11));

        let fast = attached_actor(0.0, 0.0).with_tick_rate(120.0);
        assert_eq!(fast.jump_ticks(), Some(44));

        let crate_box = Entity::movable(EntityId(2), 0.0, 0.0, 5.0, 5.0, 1.0).with_tick_rate(30.0);
        assert_eq!(crate_box.jump_ticks(), None);
    }

    #[test]
    fn gravity_accumulates_every_tick() {
        let mut actor = attached_actor(500.0, 0.0);
        let mut expected_velocity = 0.0;
        for n in 1..=5 {
            actor.update(&mut quiet).unwrap();
            expected_velocity += 0.5 * n as f32;
            assert_eq!(actor.gravity_velocity(), Some(0.5 * n as f32));
            assert_eq!(actor.velocity().map(|v| v.y), Some(expected_velocity));
        }
    }

    #[test]
    fn second_jump_while_airborne_is_ignored() {
        let mut actor = attached_actor(100.0, 200.0);
        actor.move_up().unwrap();
        let after_first = (actor.velocity(), actor.is_jumping());
        actor.move_up().unwrap();
        assert_eq!((actor.velocity(), actor.is_jumping()), after_first);
        assert_eq!(actor.velocity().map(|v| v.y), Some(-10.0));
        assert!(!actor.gravity_enabled());
    }

    #[test]
    fn jump_rises_then_gravity_resumes_after_budget() {
        let mut actor = attached_actor(100.0, 400.0);
        actor.move_up().unwrap();

        for _ in 0..21 {
            actor.update(&mut quiet).unwrap();
            assert!(!actor.gravity_enabled());
        }
        assert_eq!(actor.position().y, 400.0 - 210.0);

        actor.update(&mut quiet).unwrap();
        assert!(actor.gravity_enabled());
        assert_eq!(actor.gravity_velocity(), Some(0.0));
        assert!(actor.is_jumping());
    }

    #[test]
    fn reaching_the_floor_lands_the_actor() {
        let mut actor = attached_actor(100.0, 515.0);
        actor.move_down().unwrap();
        actor.update(&mut quiet).unwrap();

        assert_eq!(actor.position().y, 576.0 - 60.0);
        assert_eq!(actor.velocity(), Some(Vec2::ZERO));
        assert_eq!(actor.gravity_velocity(), Some(0.0));
        assert!(actor.gravity_enabled());
        assert!(!actor.is_jumping());
    }

    #[test]
    fn damage_ignores_non_positive_amounts() {
        let mut actor = attached_actor(0.0, 0.0);
        actor.on(EventKind::Kill, Reaction::Detach);

        assert_eq!(actor.damage(0, &mut quiet).unwrap(), Outcome::default());
        assert_eq!(actor.damage(-5, &mut quiet).unwrap(), Outcome::default());
        assert_eq!(actor.life(), Some(100));

        assert!(!actor.damage(40, &mut quiet).unwrap().detach);
        assert_eq!(actor.life(), Some(60));
        assert!(actor.damage(60, &mut quiet).unwrap().detach);
        assert_eq!(actor.life(), Some(0));
    }

    #[test]
    fn listener_reactions_receive_the_event() {
        let mut actor = attached_actor(0.0, 0.0);
        actor.on(EventKind::Kill, Reaction::Listener(ListenerId(9)));

        let mut seen = Vec::new();
        let mut record = |listener: ListenerId, source: EntityId, event: &EntityEvent| {
            seen.push((listener, source, *event));
        };
        let _ = actor.damage(100, &mut record).unwrap();

        assert_eq!(seen, vec![(ListenerId(9), EntityId(1), EntityEvent::Kill)]);
    }
}
