/*!
# Platformer Game Server

Authoritative simulation for a real-time multiplayer side-scroller.

- [`sim`]: entities, collisions, gravity/jump physics and the world tick,
  independent of any engine or transport.
- [`ecs`]: Bevy wiring. A fixed-rate schedule drains client input, runs one
  world update and serializes a full `players` snapshot every tick.
- [`config`]: environment-driven server settings.

Clients connect over WebSocket and exchange `{"event": ..., "args": [...]}`
JSON frames: they send `move` with a direction, and receive `players` with
one snapshot per live entity each tick.
*/

pub mod config;
pub mod ecs;
pub mod sim;
