//! Data-driven game balance
//!
//! Every field has a default so a partial JSON override is enough.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_FRAME_DT;
use crate::sim::manifest::Habitat;

/// Errors from loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Physics and scoring knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Added to vy once per frame (land & sky)
    pub gravity: f32,
    /// Buoyant gravity used in sea levels
    pub water_gravity: f32,
    /// Upward impulse applied on jump
    pub jump_force: f32,
    pub walk_speed: f32,

    /// Coins needed before the boss appears
    pub coins_per_level: u32,
    pub bonus_per_coin: u64,
    /// Awarded once every coin in the level is taken
    pub bonus_all_coins: u64,

    pub max_frame_dt: f32,
    pub quality: QualityPreset,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            water_gravity: 0.18,
            jump_force: 12.0,
            walk_speed: 2.2,

            coins_per_level: 20,
            bonus_per_coin: 10,
            bonus_all_coins: 200,

            max_frame_dt: MAX_FRAME_DT,
            quality: QualityPreset::Medium,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning = serde_json::from_str(json)?;
        Ok(tuning)
    }

    /// Per-frame gravity for a habitat
    pub fn gravity_for(&self, habitat: Habitat) -> f32 {
        match habitat {
            Habitat::Sea => self.water_gravity,
            Habitat::Land | Habitat::Sky => self.gravity,
        }
    }

    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "walk_speed": 150.0, "quality": "High" }"#).unwrap();
        assert_eq!(tuning.walk_speed, 150.0);
        assert_eq!(tuning.quality, QualityPreset::High);
        assert_eq!(tuning.coins_per_level, 20);
        assert_eq!(tuning.gravity, 0.5);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ walk_speed: }"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_sea_uses_water_gravity() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gravity_for(Habitat::Sea), 0.18);
        assert_eq!(tuning.gravity_for(Habitat::Land), 0.5);
        assert_eq!(tuning.gravity_for(Habitat::Sky), 0.5);
    }

    #[test]
    fn test_quality_preset_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::Low.max_particles(), 100);
    }

    #[test]
    fn test_quality_from_query_caps_particles() {
        let mut tuning = Tuning::default();
        let preset = crate::query_param("?hero=bo&quality=high", "quality")
            .and_then(QualityPreset::parse);
        tuning.quality = preset.unwrap_or_default();
        assert_eq!(tuning.quality.as_str(), "High");
        assert_eq!(tuning.max_particles(), 2000);
    }
}
