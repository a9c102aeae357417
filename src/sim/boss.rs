//! Boss: timed walk/charge state machine
//!
//! ```text
//! Walk --(timer)--> Attack --(timer)--> Walk ...
//!   \________________/ take_hit to 0 hp --> Defeated (absorbing)
//! ```
//!
//! Walk re-aims at the player every frame. Attack picks a direction on its
//! first frame and keeps it for the whole charge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Combatant, HitSource, PlayerHit};
use super::body::{HitOutcome, KineticBody, Vitality};
use super::effects::{BurstStyle, Effects};
use super::level::Terrain;
use super::manifest::{BossFrames, BossManifest, Pose};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    Walk,
    Attack,
    Defeated,
}

#[derive(Debug, Clone)]
pub struct Boss {
    /// Manifest id
    pub kind: String,
    pub body: KineticBody,
    pub vitality: Vitality,
    pub speed: f32,
    pub touch_damage: u32,
    pub walk_time: f32,
    pub attack_time: f32,
    pub state: BossState,
    /// Seconds left in the current state
    pub timer: f32,
    /// -1 left, +1 right
    pub direction: f32,
    /// Set once the current charge has picked its direction
    charge_committed: bool,
    anim_timer: f32,
    walk_frame: u8,
    attack_frame: u8,
    pub frames: BossFrames,
}

impl Boss {
    pub fn new(x: f32, y: f32, manifest: &BossManifest) -> Self {
        let walk_time = manifest.ai.walk_time();
        Self {
            kind: manifest.id.clone(),
            body: KineticBody::new(x, y, BOSS_WIDTH, BOSS_HEIGHT),
            vitality: Vitality::new(manifest.stats.max_health(), BOSS_INV_TIME),
            speed: manifest.stats.speed(),
            touch_damage: manifest.stats.touch_damage(),
            walk_time,
            attack_time: manifest.ai.attack_time(),
            state: BossState::Walk,
            timer: walk_time,
            direction: -1.0,
            charge_committed: false,
            anim_timer: 0.0,
            walk_frame: 0,
            attack_frame: 0,
            frames: manifest.frames.clone(),
        }
    }

    /// 1 while above half health, 2 after
    pub fn phase(&self) -> u8 {
        if self.vitality.health * 2 > self.vitality.max_health { 1 } else { 2 }
    }

    pub fn take_hit(&mut self, amount: u32, knock_dir: f32, fx: &mut Effects) -> HitOutcome {
        let phase = self.phase();
        let knockback = Vec2::new(BOSS_KNOCKBACK_X * knock_dir, BOSS_KNOCKBACK_Y);
        let outcome = self.vitality.apply(amount, &mut self.body, knockback);
        if !outcome.landed() {
            return outcome;
        }

        let center = self.body.pos - Vec2::new(0.0, self.body.size.y / 2.0);
        fx.spawn(center, &BurstStyle::boss_hit());
        if outcome == HitOutcome::Defeated {
            self.state = BossState::Defeated;
            fx.spawn(center, &BurstStyle::boss_defeat());
            log::info!("boss {} defeated", self.kind);
        } else if self.phase() != phase {
            log::info!("boss {} enters phase {}", self.kind, self.phase());
        }
        outcome
    }

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

        self.timer -= dt;
        match self.state {
            BossState::Walk => {
                self.direction = self.body.direction_to(player.pos.x);
                self.body.vel.x = self.speed * self.direction;
                if self.timer <= 0.0 {
                    self.state = BossState::Attack;
                    self.timer = self.attack_time;
                    self.attack_frame = 0;
                    self.charge_committed = false;
                }
            }
            BossState::Attack => {
                if !self.charge_committed {
                    self.direction = self.body.direction_to(player.pos.x);
                    self.body.vel.x = BOSS_CHARGE_SPEED * self.direction;
                    self.charge_committed = true;
                }
                if self.timer <= 0.0 {
                    self.state = BossState::Walk;
                    self.timer = self.walk_time;
                }
            }
            BossState::Defeated => return,
        }

        self.body.step(gravity, dt, terrain);
        self.vitality.tick(dt);

        if !self.vitality.is_invulnerable() && self.body.rect().intersects(&player.rect()) {
            on_player_hit(self.touch_damage, HitSource::Boss);
        }

        self.animate(dt);
    }

    fn animate(&mut self, dt: f32) {
        self.anim_timer += dt;
        match self.state {
            BossState::Attack => {
                if self.anim_timer > 0.10 {
                    self.anim_timer = 0.0;
                    self.attack_frame = if self.attack_frame == 1 { 2 } else { 1 };
                }
            }
            BossState::Walk => {
                if self.body.vel.x.abs() > 20.0 && self.body.on_ground {
                    if self.anim_timer > 0.18 {
                        self.anim_timer = 0.0;
                        self.walk_frame = if self.walk_frame == 1 { 2 } else { 1 };
                    }
                } else {
                    self.walk_frame = 0;
                }
            }
            BossState::Defeated => {}
        }
    }
}

impl Combatant for Boss {
    fn body(&self) -> &KineticBody {
        &self.body
    }

    fn vitality(&self) -> &Vitality {
        &self.vitality
    }

    fn take_hit(&mut self, amount: u32, knock_dir: f32, fx: &mut Effects) -> HitOutcome {
        Boss::take_hit(self, amount, knock_dir, fx)
    }

    fn pose(&self) -> Pose {
        if self.vitality.is_invulnerable() {
            return Pose::Hurt;
        }
        match self.state {
            BossState::Attack if self.attack_frame == 2 => Pose::Attack2,
            BossState::Attack => Pose::Attack1,
            BossState::Walk if self.walk_frame == 1 => Pose::Walk1,
            BossState::Walk if self.walk_frame == 2 => Pose::Walk2,
            _ => Pose::Idle,
        }
    }

    fn facing(&self) -> f32 {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Platform;
    use crate::sim::manifest::{BossAi, Registry};

    const DT: f32 = 1.0 / 60.0;

    fn arena() -> Vec<Platform> {
        vec![Platform::new(-5000.0, 500.0, 10000.0, 40.0, "ground")]
    }

    fn quick_boss() -> Boss {
        let mut manifest = BossManifest::named("test");
        manifest.ai = BossAi {
            walk_time: Some(0.1),
            attack_time: Some(0.5),
        };
        Boss::new(0.0, 500.0, &manifest)
    }

    fn player_at(x: f32) -> KineticBody {
        KineticBody::new(x, 0.0, 64.0, 64.0)
    }

    #[test]
    fn test_defaults_from_manifest() {
        let b = Boss::new(0.0, 0.0, &BossManifest::named("plain"));
        assert_eq!(b.vitality.max_health, 10);
        assert_eq!(b.speed, 40.0);
        assert_eq!(b.touch_damage, 2);
        assert_eq!(b.timer, 2.5);
        assert_eq!(b.state, BossState::Walk);

        let king = Boss::new(0.0, 0.0, Registry::builtin().boss("king-bobber").unwrap());
        assert_eq!(king.vitality.health, 24);
        assert_eq!(king.walk_time, 2.6);
    }

    #[test]
    fn test_walk_tracks_player() {
        let mut b = quick_boss();
        b.update(DT, 0.5, &player_at(300.0), &arena(), &mut |_, _| {});
        assert_eq!(b.direction, 1.0);
        assert_eq!(b.body.vel.x, 40.0);

        b.update(DT, 0.5, &player_at(-300.0), &arena(), &mut |_, _| {});
        assert_eq!(b.direction, -1.0);
        assert_eq!(b.body.vel.x, -40.0);
    }

    #[test]
    fn test_charge_direction_is_locked() {
        let platforms = arena();
        let mut b = quick_boss();
        let mut frames = 0;
        while b.state == BossState::Walk {
            b.update(DT, 0.5, &player_at(1000.0), &platforms, &mut |_, _| {});
            frames += 1;
            assert!(frames < 100);
        }

        // First attack frame aims at the player
        b.update(DT, 0.5, &player_at(1000.0), &platforms, &mut |_, _| {});
        assert_eq!(b.direction, 1.0);
        assert_eq!(b.body.vel.x, 320.0);

        // Player jumps behind; the charge keeps going
        while b.state == BossState::Attack {
            b.update(DT, 0.5, &player_at(-1000.0), &platforms, &mut |_, _| {});
            if b.state == BossState::Attack {
                assert_eq!(b.direction, 1.0);
                assert_eq!(b.body.vel.x, 320.0);
            }
        }

        // Back to walking: re-aims next frame
        assert_eq!(b.state, BossState::Walk);
        b.update(DT, 0.5, &player_at(-1000.0), &platforms, &mut |_, _| {});
        assert_eq!(b.direction, -1.0);
    }

    #[test]
    fn test_cycle_timers() {
        let platforms = arena();
        let mut b = quick_boss();
        let mut states = Vec::new();
        for _ in 0..60 {
            b.update(DT, 0.5, &player_at(0.0), &platforms, &mut |_, _| {});
            if states.last() != Some(&b.state) {
                states.push(b.state);
            }
        }
        assert_eq!(
            states,
            vec![BossState::Walk, BossState::Attack, BossState::Walk, BossState::Attack]
        );
    }

    #[test]
    fn test_hits_and_phase() {
        let mut fx = Effects::new(0, 2000);
        let mut b = quick_boss();
        assert_eq!(b.phase(), 1);
        assert_eq!(b.take_hit(5, -1.0, &mut fx), HitOutcome::Wounded);
        assert_eq!(b.body.vel, Vec2::new(-220.0, -180.0));
        assert_eq!(b.phase(), 2);
        assert_eq!(fx.len(), 16);
        assert_eq!(b.pose(), Pose::Hurt);

        // Inside the window: nothing changes
        b.body.vel = Vec2::new(3.0, 4.0);
        let inv = b.vitality.inv_timer;
        assert_eq!(b.take_hit(5, 1.0, &mut fx), HitOutcome::Ignored);
        assert_eq!(b.vitality.health, 5);
        assert_eq!(b.vitality.inv_timer, inv);
        assert_eq!(b.body.vel, Vec2::new(3.0, 4.0));
        assert_eq!(b.state, BossState::Walk);
        assert_eq!(fx.len(), 16);

        b.vitality.tick(0.35);
        assert_eq!(b.take_hit(5, 1.0, &mut fx), HitOutcome::Defeated);
        assert_eq!(b.state, BossState::Defeated);
        assert_eq!(fx.len(), 16 + 16 + 40);
    }

    #[test]
    fn test_contact_damage_reports_boss() {
        let mut b = quick_boss();
        let mut hits = Vec::new();
        b.update(DT, 0.5, &KineticBody::new(10.0, 500.0, 64.0, 64.0), &arena(), &mut |d, s| {
            hits.push((d, s))
        });
        assert_eq!(hits, vec![(2, HitSource::Boss)]);
    }

    #[test]
    fn test_defeated_boss_is_frozen() {
        let mut fx = Effects::new(0, 2000);
        let mut b = quick_boss();
        b.take_hit(100, 1.0, &mut fx);
        let body = b.body;
        let timer = b.timer;
        let mut hits = 0;
        for _ in 0..30 {
            b.update(DT, 0.5, &KineticBody::new(0.0, 500.0, 64.0, 64.0), &arena(), &mut |_, _| {
                hits += 1
            });
        }
        assert_eq!(b.body, body);
        assert_eq!(b.timer, timer);
        assert_eq!(b.state, BossState::Defeated);
        assert_eq!(hits, 0);
    }
}
