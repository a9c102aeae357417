//! Player controller

use glam::Vec2;

use super::actor::{Combatant, HitSource};
use super::body::{HitOutcome, KineticBody, Vitality, WalkCycle};
use super::collision::Rect;
use super::effects::{BurstStyle, Effects};
use super::input::InputSnapshot;
use super::level::Terrain;
use super::manifest::{CharacterManifest, Habitat, Pose};
use crate::Tuning;
use crate::consts::*;

/// Movement constants for one session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Added to vy once per frame
    pub gravity: f32,
    pub walk_speed: f32,
    pub jump_force: f32,
}

impl Motion {
    pub fn new(tuning: &Tuning, habitat: Habitat) -> Self {
        Self {
            gravity: tuning.gravity_for(habitat),
            walk_speed: tuning.walk_speed,
            jump_force: tuning.jump_force,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: KineticBody,
    /// Health is the life counter
    pub vitality: Vitality,
    /// -1 left, +1 right
    pub facing: f32,
    pub is_punching: bool,
    pub punch_timer: f32,
    /// Opponents already struck by the current punch
    struck: Vec<HitSource>,
    walk: WalkCycle,
    pub character: CharacterManifest,
}

impl Player {
    pub fn new(x: f32, y: f32, character: CharacterManifest) -> Self {
        Self {
            body: KineticBody::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            vitality: Vitality::new(PLAYER_LIVES, PLAYER_INV_TIME),
            facing: 1.0,
            is_punching: false,
            punch_timer: 0.0,
            struck: Vec::new(),
            walk: WalkCycle::new(0.15),
            character,
        }
    }

    pub fn lives(&self) -> i32 {
        self.vitality.health
    }

    /// Start a punch. No-op while already punching or defeated.
    pub fn initiate_punch(&mut self) -> bool {
        if self.is_punching || self.vitality.defeated {
            return false;
        }
        self.is_punching = true;
        self.punch_timer = PUNCH_DURATION;
        self.struck.clear();
        true
    }

    /// Area the current punch reaches, in front of the player
    pub fn punch_box(&self) -> Option<Rect> {
        if !self.is_punching {
            return None;
        }
        let r = self.body.rect();
        let x = if self.facing >= 0.0 { r.right() } else { r.x - PUNCH_REACH };
        Some(Rect::new(x, r.y, PUNCH_REACH, r.h))
    }

    /// Record that the current punch hit `who`. False if it already had.
    pub fn mark_struck(&mut self, who: HitSource) -> bool {
        if self.struck.contains(&who) {
            return false;
        }
        self.struck.push(who);
        true
    }

    /// Lose `amount` lives. Knockback always pushes against the facing.
    pub fn take_hit(&mut self, amount: u32, fx: &mut Effects) -> HitOutcome {
        let knockback = Vec2::new(-self.facing * PLAYER_KNOCKBACK_X, PLAYER_KNOCKBACK_Y);
        let outcome = self.vitality.apply(amount, &mut self.body, knockback);
        if outcome.landed() {
            let center = self.body.pos - Vec2::new(0.0, self.body.size.y / 2.0);
            fx.spawn(center, &BurstStyle::player_hit());
            log::debug!("player hit for {amount}, {} lives left", self.lives());
        }
        outcome
    }

    pub fn update<T: Terrain + ?Sized>(
        &mut self,
        dt: f32,
        input: &InputSnapshot,
        motion: &Motion,
        terrain: &T,
        fx: &mut Effects,
    ) {
        if self.vitality.defeated {
            return;
        }

        self.body.vel.x = if input.right {
            motion.walk_speed
        } else if input.left {
            -motion.walk_speed
        } else {
            0.0
        };

        if input.wants_jump() && self.body.on_ground {
            self.body.vel.y = -motion.jump_force;
            self.body.on_ground = false;
            fx.spawn(self.body.pos, &BurstStyle::jump());
        }

        self.body.integrate(motion.gravity, dt);

        if self.is_punching {
            self.punch_timer -= dt;
            if self.punch_timer <= 0.0 {
                self.is_punching = false;
                self.punch_timer = 0.0;
            }
        }

        self.body.land(terrain, dt);

        if self.body.vel.x != 0.0 {
            self.facing = self.body.vel.x.signum();
        }

        self.walk
            .advance(self.body.vel.x.abs() > 0.1 && self.body.on_ground, dt);
        self.vitality.tick(dt);
    }
}

impl Combatant for Player {
    fn body(&self) -> &KineticBody {
        &self.body
    }

    fn vitality(&self) -> &Vitality {
        &self.vitality
    }

    fn take_hit(&mut self, amount: u32, _knock_dir: f32, fx: &mut Effects) -> HitOutcome {
        Player::take_hit(self, amount, fx)
    }

    fn pose(&self) -> Pose {
        if self.is_punching {
            Pose::Attack
        } else if !self.body.on_ground {
            Pose::Jump
        } else {
            self.walk.pose()
        }
    }

    fn facing(&self) -> f32 {
        self.facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::Platform;
    use crate::sim::manifest::find_character;

    const DT: f32 = 1.0 / 60.0;

    fn motion() -> Motion {
        Motion {
            gravity: 0.5,
            walk_speed: 120.0,
            jump_force: 300.0,
        }
    }

    fn ground() -> Vec<Platform> {
        vec![Platform::new(0.0, 500.0, 2000.0, 40.0, "ground")]
    }

    fn grounded_player() -> Player {
        let mut p = Player::new(300.0, 500.0, find_character("fertle").unwrap());
        p.body.on_ground = true;
        p
    }

    fn fx() -> Effects {
        Effects::new(0, 500)
    }

    #[test]
    fn test_walk_direction_right_wins() {
        let mut p = grounded_player();
        let input = InputSnapshot {
            left: true,
            right: true,
            ..Default::default()
        };
        p.update(DT, &input, &motion(), &ground(), &mut fx());
        assert_eq!(p.body.vel.x, 120.0);
        assert_eq!(p.facing, 1.0);

        let input = InputSnapshot {
            left: true,
            ..Default::default()
        };
        p.update(DT, &input, &motion(), &ground(), &mut fx());
        assert_eq!(p.body.vel.x, -120.0);
        assert_eq!(p.facing, -1.0);
    }

    #[test]
    fn test_facing_kept_while_stationary() {
        let mut p = grounded_player();
        let left = InputSnapshot {
            left: true,
            ..Default::default()
        };
        p.update(DT, &left, &motion(), &ground(), &mut fx());
        p.update(DT, &InputSnapshot::default(), &motion(), &ground(), &mut fx());
        assert_eq!(p.body.vel.x, 0.0);
        assert_eq!(p.facing, -1.0);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut effects = fx();
        let mut p = grounded_player();
        let jump = InputSnapshot {
            jump: true,
            ..Default::default()
        };
        p.update(DT, &jump, &motion(), &ground(), &mut effects);
        assert!(!p.body.on_ground);
        assert_eq!(p.body.vel.y, -300.0 + 0.5);
        assert_eq!(effects.len(), 10);

        // Airborne: holding jump does nothing more
        let vy = p.body.vel.y;
        p.update(DT, &jump, &motion(), &ground(), &mut effects);
        assert_eq!(p.body.vel.y, vy + 0.5);
        assert_eq!(effects.len(), 10);
    }

    #[test]
    fn test_up_also_jumps() {
        let mut p = grounded_player();
        let up = InputSnapshot {
            up: true,
            ..Default::default()
        };
        p.update(DT, &up, &motion(), &ground(), &mut fx());
        assert!(p.body.vel.y < 0.0);
        assert_eq!(p.pose(), Pose::Jump);
    }

    #[test]
    fn test_punch_lifecycle() {
        let mut p = grounded_player();
        assert!(p.initiate_punch());
        assert!(!p.initiate_punch());
        assert!(p.punch_box().is_some());
        assert_eq!(p.pose(), Pose::Attack);

        for _ in 0..30 {
            p.update(DT, &InputSnapshot::default(), &motion(), &ground(), &mut fx());
        }
        assert!(!p.is_punching);
        assert!(p.punch_box().is_none());
    }

    #[test]
    fn test_punch_box_faces_forward() {
        let mut p = grounded_player();
        p.initiate_punch();
        let right = p.punch_box().unwrap();
        assert_eq!(right.x, 332.0);

        p.facing = -1.0;
        let left = p.punch_box().unwrap();
        assert_eq!(left.right(), 268.0);
    }

    #[test]
    fn test_punch_strikes_each_target_once() {
        let mut p = grounded_player();
        p.initiate_punch();
        assert!(p.mark_struck(HitSource::Enemy(4)));
        assert!(!p.mark_struck(HitSource::Enemy(4)));
        assert!(p.mark_struck(HitSource::Boss));

        p.is_punching = false;
        p.initiate_punch();
        assert!(p.mark_struck(HitSource::Enemy(4)));
    }

    #[test]
    fn test_three_hits_defeat_and_window_rejects() {
        let mut effects = fx();
        let mut p = grounded_player();
        let idle = InputSnapshot::default();

        assert_eq!(p.take_hit(1, &mut effects), HitOutcome::Wounded);
        assert_eq!(p.lives(), 2);
        assert_eq!(p.body.vel, Vec2::new(-200.0, -180.0));

        // Still inside the 0.6s window
        p.update(0.3, &idle, &motion(), &ground(), &mut effects);
        let inv = p.vitality.inv_timer;
        assert_eq!(p.take_hit(1, &mut effects), HitOutcome::Ignored);
        assert_eq!(p.lives(), 2);
        assert_eq!(p.vitality.inv_timer, inv);

        for _ in 0..50 {
            p.update(DT, &idle, &motion(), &ground(), &mut effects);
        }
        assert_eq!(p.take_hit(1, &mut effects), HitOutcome::Wounded);
        assert!(!p.is_defeated());

        for _ in 0..50 {
            p.update(DT, &idle, &motion(), &ground(), &mut effects);
        }
        assert_eq!(p.take_hit(1, &mut effects), HitOutcome::Defeated);
        assert!(p.is_defeated());
        assert!(!p.initiate_punch());
    }

    #[test]
    fn test_defeated_player_is_frozen() {
        let mut effects = fx();
        let mut p = grounded_player();
        p.take_hit(5, &mut effects);
        let before = p.body;
        let input = InputSnapshot {
            right: true,
            jump: true,
            ..Default::default()
        };
        for _ in 0..10 {
            p.update(DT, &input, &motion(), &ground(), &mut effects);
        }
        assert_eq!(p.body, before);
        assert_eq!(p.lives(), -2);
    }
}
