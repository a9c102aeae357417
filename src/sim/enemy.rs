//! Patrolling enemy
//!
//! Walks at a constant speed and turns around at platform edges. Deals
//! contact damage every frame it overlaps the player while not itself
//! invulnerable; there is no per-victim cooldown beyond the player's own
//! window.

use glam::Vec2;

use super::actor::{Combatant, HitSource, PlayerHit};
use super::body::{HitOutcome, KineticBody, Vitality, WalkCycle};
use super::effects::{BurstStyle, Effects};
use super::level::Terrain;
use super::manifest::{EnemyFrames, EnemyManifest, Pose};
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    /// Manifest id
    pub kind: String,
    pub body: KineticBody,
    pub vitality: Vitality,
    pub speed: f32,
    pub touch_damage: u32,
    /// -1 left, +1 right
    pub direction: f32,
    walk: WalkCycle,
    pub frames: EnemyFrames,
}

impl Enemy {
    pub fn new(id: u32, x: f32, y: f32, manifest: &EnemyManifest) -> Self {
        Self {
            id,
            kind: manifest.id.clone(),
            body: KineticBody::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            vitality: Vitality::new(manifest.stats.health(), ENEMY_INV_TIME),
            speed: manifest.stats.speed(),
            touch_damage: manifest.stats.touch_damage(),
            direction: -1.0,
            walk: WalkCycle::new(0.18),
            frames: manifest.frames.clone(),
        }
    }

    pub fn take_hit(&mut self, amount: u32, knock_dir: f32, fx: &mut Effects) -> HitOutcome {
        let knockback = Vec2::new(ENEMY_KNOCKBACK_X * knock_dir, ENEMY_KNOCKBACK_Y);
        let outcome = self.vitality.apply(amount, &mut self.body, knockback);
        let center = self.body.pos - Vec2::new(0.0, self.body.size.y / 2.0);
        match outcome {
            HitOutcome::Ignored => {}
            HitOutcome::Wounded => fx.spawn(center, &BurstStyle::enemy_hit()),
            HitOutcome::Defeated => {
                fx.spawn(center, &BurstStyle::enemy_hit());
                fx.spawn(center, &BurstStyle::enemy_defeat());
                log::debug!("enemy {} ({}) defeated", self.id, self.kind);
            }
        }
        outcome
    }

    /// True if a platform top at exactly the current feet height covers the
    /// point `EDGE_PROBE` px ahead of the leading edge
    fn ground_ahead<T: Terrain + ?Sized>(&self, terrain: &T) -> bool {
        let probe_x = self.body.pos.x + self.direction * (self.body.size.x / 2.0 + EDGE_PROBE);
        terrain.all().iter().any(|p| {
            probe_x >= p.rect.x && probe_x <= p.rect.right() && p.rect.y == self.body.pos.y
        })
    }

    /// Patrol one frame, then report contact with `player` through
    /// `on_player_hit`
    pub fn update<T: Terrain + ?Sized>(
        &mut self,
        dt: f32,
        gravity: f32,
        player: &KineticBody,
        terrain: &T,
        on_player_hit: PlayerHit<'_>,
    ) {
        if self.vitality.defeated {
            return;
        }

        self.body.vel.x = self.speed * self.direction;
        let landed = self.body.step(gravity, dt, terrain);

        if landed && !self.ground_ahead(terrain) {
            self.direction = -self.direction;
        }

        self.walk
            .advance(self.body.vel.x.abs() > 0.1 && self.body.on_ground, dt);
        self.vitality.tick(dt);

        if !self.vitality.is_invulnerable() && self.body.rect().intersects(&player.rect()) {
            on_player_hit(self.touch_damage, HitSource::Enemy(self.id));
        }
    }
}

impl Combatant for Enemy {
    fn body(&self) -> &KineticBody {
        &self.body
    }

    fn vitality(&self) -> &Vitality {
        &self.vitality
    }

    fn take_hit(&mut self, amount: u32, knock_dir: f32, fx: &mut Effects) -> HitOutcome {
        Enemy::take_hit(self, amount, knock_dir, fx)
    }

    fn pose(&self) -> Pose {
        self.walk.pose()
    }

    fn facing(&self) -> f32 {
        self.direction
    }
}
