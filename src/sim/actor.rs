//! Common surface of player, enemy and boss

use super::body::{HitOutcome, KineticBody, Vitality};
use super::collision::Rect;
use super::effects::Effects;
use super::manifest::Pose;

/// Who dealt contact damage to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    /// Enemy entity id
    Enemy(u32),
    Boss,
}

/// Contact-damage callback handed to enemy and boss updates:
/// `(damage, source)`. The actor never touches the player itself.
pub type PlayerHit<'a> = &'a mut dyn FnMut(u32, HitSource);

/// Anything with a body that can be hurt
pub trait Combatant {
    fn body(&self) -> &KineticBody;

    fn vitality(&self) -> &Vitality;

    /// Apply damage. `knock_dir` (-1 or +1) is the horizontal direction of
    /// the knockback; actors with a fixed policy may ignore it.
    fn take_hit(&mut self, amount: u32, knock_dir: f32, fx: &mut Effects) -> HitOutcome;

    /// Current visual state key
    fn pose(&self) -> Pose;

    /// -1 faces left, +1 faces right
    fn facing(&self) -> f32;

    fn is_defeated(&self) -> bool {
        self.vitality().defeated
    }

    fn rect(&self) -> Rect {
        self.body().rect()
    }

    fn blink_on(&self) -> bool {
        self.vitality().blink_on()
    }
}
