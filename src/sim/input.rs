//! Player input
//!
//! `InputState` is built once per session and handed to `tick` by
//! reference. Keyboard and touch events write into it; the simulation reads
//! a copy (`InputSnapshot`) each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::manifest::Habitat;

/// Per-frame control flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub attack: bool,
    /// Device orientation (front/back), degrees
    pub tilt_x: f32,
    /// Device orientation (left/right), degrees
    pub tilt_y: f32,
}

impl InputSnapshot {
    pub fn wants_jump(&self) -> bool {
        self.up || self.jump
    }
}

/// Screen region of a touch control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchZone {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Attack,
}

/// Touch zone under `(x, y)` for a habitat's layout on a `size` viewport
///
/// - land: 20% side strips walk, bottom 20% is jump (left half) / attack
/// - sea: side strips swim sideways, the rest is up (top half) / down
/// - sky: only the bottom-right corner (attack)
pub fn zone_at(scheme: Habitat, x: f32, y: f32, size: Vec2) -> Option<TouchZone> {
    let (w, h) = (size.x, size.y);
    match scheme {
        Habitat::Land => {
            if x < w * 0.20 {
                Some(TouchZone::Left)
            } else if x > w * 0.80 {
                Some(TouchZone::Right)
            } else if y > h * 0.80 {
                Some(if x < w * 0.50 { TouchZone::Jump } else { TouchZone::Attack })
            } else {
                None
            }
        }
        Habitat::Sea => {
            if x < w * 0.20 {
                Some(TouchZone::Left)
            } else if x > w * 0.80 {
                Some(TouchZone::Right)
            } else if y < h * 0.50 {
                Some(TouchZone::Up)
            } else {
                Some(TouchZone::Down)
            }
        }
        Habitat::Sky => (y > h * 0.80 && x > w * 0.50).then_some(TouchZone::Attack),
    }
}

/// Input context owned by the session host
#[derive(Debug, Clone, Default)]
pub struct InputState {
    state: InputSnapshot,
    scheme: Habitat,
}

impl InputState {
    pub fn new(scheme: Habitat) -> Self {
        Self {
            state: InputSnapshot::default(),
            scheme,
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        self.state
    }

    /// Apply a `KeyboardEvent.code`. Returns true when this press starts an
    /// attack (key-down edge of B); held repeats do not.
    pub fn key(&mut self, code: &str, down: bool) -> bool {
        match code {
            "ArrowLeft" | "KeyA" => self.state.left = down,
            "ArrowRight" | "KeyD" => self.state.right = down,
            "ArrowUp" | "KeyW" | "Space" => {
                self.state.up = down;
                self.state.jump = down;
            }
            "ArrowDown" | "KeyS" => self.state.down = down,
            "KeyB" => {
                let edge = down && !self.state.attack;
                self.state.attack = down;
                return edge;
            }
            _ => {}
        }
        false
    }

    /// Replace the touch-driven flags from the current touch points
    /// (viewport-relative). Returns true if any touch sits on the attack zone.
    pub fn touches(&mut self, points: &[Vec2], viewport: Vec2) -> bool {
        self.state.left = false;
        self.state.right = false;
        self.state.up = false;
        self.state.down = false;
        self.state.jump = false;
        self.state.attack = false;

        for p in points {
            match zone_at(self.scheme, p.x, p.y, viewport) {
                Some(TouchZone::Left) => self.state.left = true,
                Some(TouchZone::Right) => self.state.right = true,
                Some(TouchZone::Jump | TouchZone::Up) => {
                    self.state.up = true;
                    self.state.jump = true;
                }
                Some(TouchZone::Down) => self.state.down = true,
                Some(TouchZone::Attack) => self.state.attack = true,
                None => {}
            }
        }
        self.state.attack
    }

    pub fn tilt(&mut self, beta: f32, gamma: f32) {
        self.state.tilt_x = beta;
        self.state.tilt_y = gamma;
    }

    /// Drop every held control (focus loss, level change)
    pub fn release_all(&mut self) {
        self.state = InputSnapshot {
            tilt_x: self.state.tilt_x,
            tilt_y: self.state.tilt_y,
            ..InputSnapshot::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Vec2 = Vec2::new(1000.0, 500.0);

    #[test]
    fn test_keyboard_mapping() {
        let mut input = InputState::new(Habitat::Land);
        input.key("KeyA", true);
        input.key("Space", true);
        let s = input.snapshot();
        assert!(s.left && s.up && s.jump);
        assert!(s.wants_jump());

        input.key("Space", false);
        input.key("KeyA", false);
        assert_eq!(input.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_attack_fires_on_edge_only() {
        let mut input = InputState::new(Habitat::Land);
        assert!(input.key("KeyB", true));
        // Auto-repeat keydown
        assert!(!input.key("KeyB", true));
        assert!(input.snapshot().attack);
        assert!(!input.key("KeyB", false));
        assert!(input.key("KeyB", true));
    }

    #[test]
    fn test_land_zones() {
        let z = |x, y| zone_at(Habitat::Land, x, y, VIEW);
        assert_eq!(z(100.0, 100.0), Some(TouchZone::Left));
        assert_eq!(z(900.0, 450.0), Some(TouchZone::Right));
        assert_eq!(z(300.0, 450.0), Some(TouchZone::Jump));
        assert_eq!(z(700.0, 450.0), Some(TouchZone::Attack));
        assert_eq!(z(500.0, 100.0), None);
    }

    #[test]
    fn test_sea_and_sky_zones() {
        assert_eq!(zone_at(Habitat::Sea, 500.0, 100.0, VIEW), Some(TouchZone::Up));
        assert_eq!(zone_at(Habitat::Sea, 500.0, 300.0, VIEW), Some(TouchZone::Down));
        assert_eq!(zone_at(Habitat::Sky, 100.0, 100.0, VIEW), None);
        assert_eq!(zone_at(Habitat::Sky, 900.0, 450.0, VIEW), Some(TouchZone::Attack));
    }

    #[test]
    fn test_touches_replace_state() {
        let mut input = InputState::new(Habitat::Land);
        let attacked = input.touches(&[Vec2::new(50.0, 50.0), Vec2::new(700.0, 450.0)], VIEW);
        assert!(attacked);
        assert!(input.snapshot().left);

        assert!(!input.touches(&[], VIEW));
        assert_eq!(input.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_release_keeps_tilt() {
        let mut input = InputState::new(Habitat::Sky);
        input.tilt(10.0, -5.0);
        input.key("ArrowRight", true);
        input.release_all();
        let s = input.snapshot();
        assert!(!s.right);
        assert_eq!((s.tilt_x, s.tilt_y), (10.0, -5.0));
    }
}
