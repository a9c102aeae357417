//! Particle bursts
//!
//! Purely cosmetic. The session owns one `Effects` and drops it with the
//! level, so nothing leaks across reloads. The RNG is seeded per session to
//! keep runs reproducible.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Linear RGBA, components 0..=255 except alpha 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32,
            g: g as f32,
            b: b as f32,
            a: 1.0,
        }
    }

    /// Same color, fully transparent
    pub const fn faded(self) -> Self {
        Self { a: 0.0, ..self }
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS `rgba(...)` string for canvas fill styles
    pub fn to_css(self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r.round() as i32,
            self.g.round() as i32,
            self.b.round() as i32,
            self.a
        )
    }
}

/// Shape of a particle burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstStyle {
    pub count: usize,
    /// Pixels per second before the 0.6..1.2 jitter
    pub base_speed: f32,
    /// Emission cone in radians, centered on +x
    pub spread: f32,
    /// Seconds
    pub life: f32,
    pub start_size: f32,
    pub end_size: f32,
    pub start_color: Rgba,
    pub end_color: Rgba,
}

impl Default for BurstStyle {
    fn default() -> Self {
        Self {
            count: 8,
            base_speed: 100.0,
            spread: std::f32::consts::TAU,
            life: 0.6,
            start_size: 4.0,
            end_size: 0.0,
            start_color: Rgba::WHITE,
            end_color: Rgba::WHITE.faded(),
        }
    }
}

impl BurstStyle {
    fn tinted(count: usize, base_speed: f32, life: f32, color: Rgba) -> Self {
        Self {
            count,
            base_speed,
            life,
            start_color: color,
            end_color: color.faded(),
            ..Self::default()
        }
    }

    pub fn jump() -> Self {
        Self::tinted(10, 90.0, 0.35, Rgba::WHITE)
    }

    pub fn player_hit() -> Self {
        Self::tinted(12, 160.0, 0.5, Rgba::rgb(0xff, 0x80, 0x80))
    }

    pub fn enemy_hit() -> Self {
        Self::tinted(8, 120.0, 0.5, Rgba::rgb(0xff, 0x40, 0x40))
    }

    pub fn enemy_defeat() -> Self {
        Self::tinted(20, 200.0, 0.8, Rgba::rgb(0xff, 0xdb, 0x4d))
    }

    pub fn boss_hit() -> Self {
        Self::tinted(16, 200.0, 0.6, Rgba::rgb(0xff, 0x6b, 0x6b))
    }

    pub fn boss_defeat() -> Self {
        Self::tinted(40, 260.0, 1.0, Rgba::rgb(0xff, 0xd8, 0x6b))
    }

    /// Gold upward fan on coin pickup
    pub fn coin() -> Self {
        Self {
            spread: std::f32::consts::PI,
            start_size: 6.0,
            ..Self::tinted(10, 80.0, 0.5, Rgba::rgb(255, 215, 0))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub life: f32,
    pub start_size: f32,
    pub end_size: f32,
    pub start_color: Rgba,
    pub end_color: Rgba,
}

impl Particle {
    /// 0 at birth, 1 at expiry
    pub fn progress(&self) -> f32 {
        if self.life <= 0.0 {
            1.0
        } else {
            (self.age / self.life).clamp(0.0, 1.0)
        }
    }
}

/// Interpolated particle ready to paint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

/// Session-scoped particle pool
#[derive(Debug, Clone)]
pub struct Effects {
    particles: Vec<Particle>,
    rng: Pcg32,
    max_particles: usize,
}

impl Effects {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            max_particles,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Emit `style.count` particles at `origin`. The oldest particles are
    /// dropped once the pool is full.
    pub fn spawn(&mut self, origin: Vec2, style: &BurstStyle) {
        let half = style.spread / 2.0;
        for _ in 0..style.count {
            let angle = if half > 0.0 {
                self.rng.random_range(-half..half)
            } else {
                0.0
            };
            let speed = style.base_speed * self.rng.random_range(0.6f32..1.2);
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                age: 0.0,
                life: style.life,
                start_size: style.start_size,
                end_size: style.end_size,
                start_color: style.start_color,
                end_color: style.end_color,
            });
        }

        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Age, expire, move, then apply drag
    pub fn step(&mut self, dt: f32) {
        self.particles.retain_mut(|p| {
            p.age += dt;
            if p.age >= p.life {
                return false;
            }
            p.pos += p.vel * dt;
            p.vel.x *= 0.98;
            // y factor exceeds 1 for any real dt, so vertical motion accelerates
            p.vel.y *= 0.98 + 40.0 * dt;
            true
        });
    }

    pub fn render(&self) -> Vec<ParticleSprite> {
        self.particles
            .iter()
            .map(|p| {
                let t = p.progress();
                ParticleSprite {
                    pos: p.pos,
                    radius: p.start_size + (p.end_size - p.start_size) * t,
                    color: p.start_color.lerp(p.end_color, t),
                }
            })
            .collect()
    }
}
