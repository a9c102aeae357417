//! Level session state
//!
//! One `Session` per played level. It owns every entity, the particle pool
//! and the win/lose phase; dropping it drops the whole level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::collision::Rect;
use super::effects::Effects;
use super::enemy::Enemy;
use super::level::{LevelDescriptor, LevelError, Platform, PlatformIndex, Terrain};
use super::manifest::{BossManifest, CharacterManifest, Habitat, Registry};
use super::player::{Motion, Player};
use crate::Tuning;
use crate::consts::COIN_SIZE;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    Playing,
    /// Boss defeated
    Complete,
    /// Player out of lives
    GameOver,
}

/// Phase change reported by `tick`, exactly once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    LevelComplete { habitat: Habitat },
    GameOver,
}

/// Collectible coin, top-left anchored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub rect: Rect,
    /// Pulse scale, 0.85..=1.15
    pub scale: f32,
    pulse_dir: f32,
}

impl Coin {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            rect: Rect::new(x, y, COIN_SIZE, COIN_SIZE),
            scale: 1.0,
            pulse_dir: 1.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.scale += self.pulse_dir * dt * 0.8;
        if self.scale > 1.15 {
            self.scale = 1.15;
            self.pulse_dir = -1.0;
        }
        if self.scale < 0.85 {
            self.scale = 0.85;
            self.pulse_dir = 1.0;
        }
    }

    pub fn touches(&self, player: &Rect) -> bool {
        self.rect.intersects(player)
    }
}

/// Boss waiting for the coin threshold
#[derive(Debug, Clone)]
pub struct PendingBoss {
    pub manifest: BossManifest,
    pub at: Vec2,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub habitat: Habitat,
    pub seed: u64,
    pub tuning: Tuning,
    pub motion: Motion,
    pub terrain: PlatformIndex,
    pub player: Player,
    pub coins: Vec<Coin>,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    /// None when the level names no boss or its manifest is unknown
    pub pending_boss: Option<PendingBoss>,
    boss_spawned: bool,
    pub coins_collected: u32,
    /// Coins placed in the level
    pub coins_total: u32,
    pub score: u64,
    pub all_coins_bonus: bool,
    pub camera: Vec2,
    pub viewport: Vec2,
    /// Right-most platform edge, lowest platform top
    pub level_size: Vec2,
    pub phase: LevelPhase,
    pub effects: Effects,
    pub time_ticks: u64,
    next_id: u32,
}

impl Session {
    /// Build a session from a parsed level. Unknown enemy types are skipped
    /// with a warning; an unknown boss leaves the level without one.
    pub fn new(
        level: &LevelDescriptor,
        character: CharacterManifest,
        registry: &Registry,
        tuning: Tuning,
        seed: u64,
    ) -> Self {
        let habitat = character.habitat;
        let platforms: Vec<Platform> = level.platforms.iter().map(Platform::from).collect();
        let (width, height) = level.extent();

        let pending_boss = level.boss.as_ref().and_then(|spawn| {
            match registry.boss(&spawn.id) {
                Some(manifest) => Some(PendingBoss {
                    manifest: manifest.clone(),
                    at: Vec2::new(spawn.x, spawn.y),
                }),
                None => {
                    log::warn!("Unknown boss: {}", spawn.id);
                    None
                }
            }
        });

        let mut session = Self {
            habitat,
            seed,
            motion: Motion::new(&tuning, habitat),
            effects: Effects::new(seed, tuning.max_particles()),
            tuning,
            terrain: PlatformIndex::new(platforms),
            player: Player::new(level.player_start.x, level.player_start.y, character),
            coins: Vec::with_capacity(level.coins.len()),
            enemies: Vec::with_capacity(level.enemies.len()),
            boss: None,
            pending_boss,
            boss_spawned: false,
            coins_collected: 0,
            coins_total: level.coins.len() as u32,
            score: 0,
            all_coins_bonus: false,
            camera: Vec2::ZERO,
            viewport: Vec2::new(960.0, 540.0),
            level_size: Vec2::new(width, height),
            phase: LevelPhase::Playing,
            time_ticks: 0,
            next_id: 1,
        };

        for c in &level.coins {
            let id = session.next_entity_id();
            session.coins.push(Coin::new(id, c.x, c.y));
        }

        for spawn in &level.enemies {
            let Some(manifest) = registry.enemy(&spawn.kind) else {
                log::warn!("Unknown enemy type: {}", spawn.kind);
                continue;
            };
            let id = session.next_entity_id();
            session.enemies.push(Enemy::new(id, spawn.x, spawn.y, manifest));
        }

        log::info!(
            "{} level loaded: {} platforms, {} coins, {} enemies",
            habitat.as_str(),
            session.terrain.len(),
            session.coins.len(),
            session.enemies.len()
        );
        session
    }

    pub fn from_json(
        json: &str,
        character: CharacterManifest,
        registry: &Registry,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Self, LevelError> {
        let level = LevelDescriptor::from_json(json)?;
        Ok(Self::new(&level, character, registry, tuning, seed))
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn platforms(&self) -> &[Platform] {
        self.terrain.all()
    }

    /// Host attack edge: start a punch
    pub fn attack(&mut self) -> bool {
        self.phase == LevelPhase::Playing && self.player.initiate_punch()
    }

    pub fn boss_spawned(&self) -> bool {
        self.boss_spawned
    }

    /// Bring in the boss. Runs at most once per session; a level without a
    /// usable boss manifest turns this into a no-op.
    pub fn spawn_boss(&mut self) -> bool {
        if self.boss_spawned {
            return false;
        }
        self.boss_spawned = true;
        let Some(pending) = self.pending_boss.take() else {
            return false;
        };
        log::info!(
            "boss {} spawns at ({}, {})",
            pending.manifest.id,
            pending.at.x,
            pending.at.y
        );
        self.boss = Some(Boss::new(pending.at.x, pending.at.y, &pending.manifest));
        true
    }

    /// Center the camera on the player, clamped to the level
    pub fn update_camera(&mut self) {
        let max = (self.level_size - self.viewport).max(Vec2::ZERO);
        let target = self.player.body.pos - self.viewport / 2.0;
        self.camera = Vec2::new(
            crate::clamp(target.x, 0.0, max.x),
            crate::clamp(target.y, 0.0, max.y),
        );
    }
}
