//! Leila's Game - a land/sea/sky side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, AI, damage, level session)
//! - `render`: Flattens a session into draw commands for the host canvas
//! - `tuning`: Data-driven game balance

pub mod render;
pub mod sim;
pub mod tuning;

pub use tuning::{QualityPreset, Tuning};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (absorbs backgrounded tabs)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Player box (feet-anchored)
    pub const PLAYER_WIDTH: f32 = 64.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    pub const PLAYER_LIVES: i32 = 3;
    /// Invulnerability window after the player is hit (seconds)
    pub const PLAYER_INV_TIME: f32 = 0.6;
    pub const PUNCH_DURATION: f32 = 0.35;
    /// Horizontal reach of a punch in front of the player box
    pub const PUNCH_REACH: f32 = 40.0;
    pub const PLAYER_KNOCKBACK_X: f32 = 200.0;
    pub const PLAYER_KNOCKBACK_Y: f32 = -180.0;

    /// Enemy box and default stats
    pub const ENEMY_WIDTH: f32 = 64.0;
    pub const ENEMY_HEIGHT: f32 = 64.0;
    pub const ENEMY_INV_TIME: f32 = 0.25;
    pub const ENEMY_KNOCKBACK_X: f32 = 180.0;
    pub const ENEMY_KNOCKBACK_Y: f32 = -140.0;
    /// Distance past the leading box edge probed for ground
    pub const EDGE_PROBE: f32 = 4.0;

    /// Boss box and charge
    pub const BOSS_WIDTH: f32 = 128.0;
    pub const BOSS_HEIGHT: f32 = 128.0;
    pub const BOSS_INV_TIME: f32 = 0.35;
    pub const BOSS_KNOCKBACK_X: f32 = 220.0;
    pub const BOSS_KNOCKBACK_Y: f32 = -180.0;
    pub const BOSS_CHARGE_SPEED: f32 = 320.0;

    /// Coin box
    pub const COIN_SIZE: f32 = 32.0;

    /// Level pool size per habitat
    pub const LEVEL_COUNT: u32 = 10;
}

/// Saturate `v` into `[min, max]`
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

/// Cap a raw frame delta so a long pause doesn't explode the physics
#[inline]
pub fn cap_frame_dt(raw: f32, max_dt: f32) -> f32 {
    if raw.is_nan() || raw < 0.0 {
        0.0
    } else {
        raw.min(max_dt)
    }
}

/// Value of `key` in a URL query string (`?hero=bo&quality=low`)
pub fn query_param<'a>(search: &'a str, key: &str) -> Option<&'a str> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param() {
        let search = "?hero=snapper&quality=low&hero2=x";
        assert_eq!(query_param(search, "hero"), Some("snapper"));
        assert_eq!(query_param(search, "quality"), Some("low"));
        assert_eq!(query_param(search, "her"), None);
        assert_eq!(query_param("", "hero"), None);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(4.5, 0.0, 10.0), 4.5);
    }

    #[test]
    fn test_cap_frame_dt() {
        assert_eq!(cap_frame_dt(1.5, consts::MAX_FRAME_DT), consts::MAX_FRAME_DT);
        assert_eq!(cap_frame_dt(0.016, consts::MAX_FRAME_DT), 0.016);
        assert_eq!(cap_frame_dt(-1.0, consts::MAX_FRAME_DT), 0.0);
    }
}
