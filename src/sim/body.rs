//! Shared actor building blocks
//!
//! `KineticBody` is the moving box every actor carries; `Vitality` is the
//! damageable capability (health, invulnerability window, defeat flag).
//! Player, enemy and boss hold one of each and delegate to them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::level::Terrain;
use super::manifest::Pose;

/// Position (feet anchor), velocity and box of a moving actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticBody {
    /// Bottom-center of the box, world space
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub size: Vec2,
    /// Recomputed by every landing pass
    pub on_ground: bool,
}

impl KineticBody {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(width, height),
            on_ground: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_feet(self.pos, self.size)
    }

    /// Gravity is added once per frame regardless of `dt`; position moves
    /// by `vel * dt`.
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.vel.y += gravity;
        self.pos += self.vel * dt;
    }

    /// Stop on any platform the box now overlaps, but only when moving down
    /// and the feet were at or above its top last frame. Returns true if the
    /// body landed.
    pub fn land<T: Terrain + ?Sized>(&mut self, terrain: &T, dt: f32) -> bool {
        self.on_ground = false;
        let rect = self.rect();
        for platform in terrain.candidates(&rect) {
            if !rect.intersects(&platform.rect) {
                continue;
            }
            let prev_feet = self.pos.y - self.vel.y * dt;
            if self.vel.y >= 0.0 && prev_feet <= platform.rect.y {
                self.pos.y = platform.rect.y;
                self.vel.y = 0.0;
                self.on_ground = true;
            }
        }
        self.on_ground
    }

    /// Integrate then resolve landing
    pub fn step<T: Terrain + ?Sized>(&mut self, gravity: f32, dt: f32, terrain: &T) -> bool {
        self.integrate(gravity, dt);
        self.land(terrain, dt)
    }

    /// -1 or +1 toward `target_x` (ties face right)
    pub fn direction_to(&self, target_x: f32) -> f32 {
        if target_x - self.pos.x >= 0.0 { 1.0 } else { -1.0 }
    }
}

/// Result of a single damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Rejected: invulnerable or already defeated
    Ignored,
    Wounded,
    /// This hit took health to zero or below
    Defeated,
}

impl HitOutcome {
    pub fn landed(self) -> bool {
        self != HitOutcome::Ignored
    }
}

/// Health pool with an invulnerability window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitality {
    pub health: i32,
    pub max_health: i32,
    /// Seconds of invulnerability left
    pub inv_timer: f32,
    /// Window granted by each landed hit
    pub inv_time: f32,
    /// Monotonic
    pub defeated: bool,
}

impl Vitality {
    pub fn new(health: i32, inv_time: f32) -> Self {
        Self {
            health,
            max_health: health,
            inv_timer: 0.0,
            inv_time,
            defeated: false,
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.inv_timer > 0.0
    }

    /// Subtract health, restart the window and overwrite velocity with the
    /// knockback. No-op while invulnerable or defeated.
    pub fn apply(&mut self, amount: u32, body: &mut KineticBody, knockback: Vec2) -> HitOutcome {
        if self.is_invulnerable() || self.defeated {
            return HitOutcome::Ignored;
        }
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount);
        self.inv_timer = self.inv_time;
        body.vel = knockback;

        if self.health <= 0 {
            self.defeated = true;
            HitOutcome::Defeated
        } else {
            HitOutcome::Wounded
        }
    }

    /// Count the window down, never below zero
    pub fn tick(&mut self, dt: f32) {
        if self.inv_timer > 0.0 {
            self.inv_timer = (self.inv_timer - dt).max(0.0);
        }
    }

    /// Blink phase while invulnerable (20 Hz)
    pub fn blink_on(&self) -> bool {
        self.is_invulnerable() && ((self.inv_timer * 20.0).floor() as i64) % 2 == 0
    }

    /// Health as a 0..=1 fraction
    pub fn fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health.max(0) as f32 / self.max_health as f32).min(1.0)
    }
}

/// Two-frame walk animation counter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkCycle {
    timer: f32,
    /// 0 = idle, 1 = walk1, 2 = walk2
    frame: u8,
    period: f32,
}

impl WalkCycle {
    pub fn new(period: f32) -> Self {
        Self {
            timer: 0.0,
            frame: 0,
            period,
        }
    }

    pub fn advance(&mut self, moving: bool, dt: f32) {
        if moving {
            self.timer += dt;
            if self.timer > self.period {
                self.timer = 0.0;
                self.frame = if self.frame == 1 { 2 } else { 1 };
            }
        } else {
            self.frame = 0;
            self.timer = 0.0;
        }
    }

    pub fn pose(&self) -> Pose {
        match self.frame {
            1 => Pose::Walk1,
            2 => Pose::Walk2,
            _ => Pose::Idle,
        }
    }
}
