//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through `tick(dt)`
//! - Seeded RNG only (particles)
//! - Stable iteration order (spawn order, level order for platforms)
//! - No rendering or platform dependencies

pub mod actor;
pub mod body;
pub mod boss;
pub mod collision;
pub mod effects;
pub mod enemy;
pub mod input;
pub mod level;
pub mod manifest;
pub mod player;
pub mod quadtree;
pub mod state;
pub mod tick;

pub use actor::{Combatant, HitSource, PlayerHit};
pub use body::{HitOutcome, KineticBody, Vitality};
pub use boss::{Boss, BossState};
pub use collision::{Rect, intersects, point_in_rect};
pub use effects::{BurstStyle, Effects, ParticleSprite, Rgba};
pub use enemy::Enemy;
pub use input::{InputSnapshot, InputState, TouchZone};
pub use level::{LevelDescriptor, LevelError, Platform, PlatformIndex, Terrain, level_path};
pub use manifest::{CharacterManifest, Habitat, Pose, Registry};
pub use player::{Motion, Player};
pub use quadtree::Quadtree;
pub use state::{Coin, LevelPhase, Session, Transition};
pub use tick::tick;
