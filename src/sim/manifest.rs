//! Character, enemy and boss manifests
//!
//! Manifests are opaque to the physics: the simulation only reads stats
//! (with a default for every missing field) and hands frame names to the
//! renderer as a visual-state selector.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One of the three biomes; selects roster, input scheme and level pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habitat {
    #[default]
    Land,
    Sea,
    Sky,
}

impl Habitat {
    pub const ALL: [Habitat; 3] = [Habitat::Land, Habitat::Sea, Habitat::Sky];

    pub fn as_str(&self) -> &'static str {
        match self {
            Habitat::Land => "land",
            Habitat::Sea => "sea",
            Habitat::Sky => "sky",
        }
    }
}

/// Visual state key; the renderer maps it to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pose {
    Idle,
    Walk1,
    Walk2,
    Jump,
    Attack,
    Attack1,
    Attack2,
    Hurt,
}

/// Named frame slots for a hero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSet {
    pub idle: String,
    pub walk1: String,
    pub walk2: String,
    pub jump: String,
    pub attack: String,
}

impl FrameSet {
    /// Standard `char_<id>_<slot>.png` names
    pub fn for_hero(id: &str) -> Self {
        let slot = |s: &str| format!("char_{id}_{s}.png");
        Self {
            idle: slot("idle"),
            walk1: slot("walk1"),
            walk2: slot("walk2"),
            jump: slot("jump"),
            attack: slot("attack"),
        }
    }

    pub fn frame(&self, pose: Pose) -> &str {
        match pose {
            Pose::Walk1 => &self.walk1,
            Pose::Walk2 => &self.walk2,
            Pose::Jump => &self.jump,
            Pose::Attack | Pose::Attack1 | Pose::Attack2 => &self.attack,
            Pose::Idle | Pose::Hurt => &self.idle,
        }
    }
}

/// A playable hero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterManifest {
    pub id: String,
    pub name: String,
    pub habitat: Habitat,
    pub thumb: String,
    pub frames: FrameSet,
    /// Hero intro clip
    pub intro: String,
}

impl CharacterManifest {
    pub fn new(id: &str, name: &str, habitat: Habitat) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            habitat,
            thumb: format!("char_{id}.webp"),
            frames: FrameSet::for_hero(id),
            intro: format!("char_{id}.mp4"),
        }
    }

    /// Directory the frame names are relative to
    pub fn asset_base(&self) -> String {
        format!("assets/characters/{}/", self.habitat.as_str())
    }

    pub fn frame_path(&self, pose: Pose) -> String {
        format!("{}{}", self.asset_base(), self.frames.frame(pose))
    }
}

const LAND_HEROES: [(&str, &str); 8] = [
    ("fertle", "Fertle"),
    ("fygar", "Fygar"),
    ("waterwolf", "Waterwolf"),
    ("chomper", "Chomper"),
    ("fixie", "Fixie"),
    ("chunky", "Chunky"),
    ("skyjumper", "Skyjumper"),
    ("cliggy", "Cliggy"),
];

const SEA_HEROES: [(&str, &str); 8] = [
    ("peeta-heater", "Peeta Heater"),
    ("snapper", "Snapper"),
    ("swack", "Swack"),
    ("zappo", "Zappo"),
    ("yelp", "Yelp"),
    ("sixter", "Sixter"),
    ("chocker", "Chocker"),
    ("gus", "Gus"),
];

const SKY_HEROES: [(&str, &str); 8] = [
    ("bo", "Bo"),
    ("roger-dodger", "Roger Dodger"),
    ("yellogen", "Yellogen"),
    ("whipper", "Whipper"),
    ("diver", "Diver"),
    ("stinger", "Stinger"),
    ("flick", "Flick"),
    ("creeper", "Creeper"),
];

/// The eight heroes of a habitat, in menu order
pub fn roster(habitat: Habitat) -> Vec<CharacterManifest> {
    let table = match habitat {
        Habitat::Land => &LAND_HEROES,
        Habitat::Sea => &SEA_HEROES,
        Habitat::Sky => &SKY_HEROES,
    };
    table
        .iter()
        .map(|(id, name)| CharacterManifest::new(id, name, habitat))
        .collect()
}

/// Look up a hero by id across every habitat
pub fn find_character(id: &str) -> Option<CharacterManifest> {
    Habitat::ALL
        .iter()
        .flat_map(|h| roster(*h))
        .find(|c| c.id == id)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyStats {
    pub speed: Option<f32>,
    pub health: Option<i32>,
    pub touch_damage: Option<u32>,
}

impl EnemyStats {
    pub fn speed(&self) -> f32 {
        self.speed.unwrap_or(60.0)
    }

    pub fn health(&self) -> i32 {
        self.health.unwrap_or(3)
    }

    pub fn touch_damage(&self) -> u32 {
        self.touch_damage.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyFrames {
    pub idle: String,
    pub walk1: String,
    pub walk2: String,
    #[serde(default)]
    pub attack: Option<String>,
}

impl EnemyFrames {
    pub fn frame(&self, pose: Pose) -> &str {
        match pose {
            Pose::Walk1 => &self.walk1,
            Pose::Walk2 => &self.walk2,
            _ => &self.idle,
        }
    }
}

/// Patrolling enemy definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyManifest {
    pub id: String,
    #[serde(default)]
    pub frames: EnemyFrames,
    #[serde(default)]
    pub stats: EnemyStats,
}

impl EnemyManifest {
    /// Manifest with the standard `enemy_<id>_<slot>.png` frames and no stats
    pub fn named(id: &str) -> Self {
        Self {
            id: id.to_string(),
            frames: EnemyFrames {
                idle: format!("enemy_{id}_idle.png"),
                walk1: format!("enemy_{id}_walk1.png"),
                walk2: format!("enemy_{id}_walk2.png"),
                attack: Some(format!("enemy_{id}_attack.png")),
            },
            stats: EnemyStats::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossStats {
    pub max_health: Option<i32>,
    pub speed: Option<f32>,
    pub touch_damage: Option<u32>,
}

impl BossStats {
    pub fn max_health(&self) -> i32 {
        self.max_health.unwrap_or(10)
    }

    pub fn speed(&self) -> f32 {
        self.speed.unwrap_or(40.0)
    }

    pub fn touch_damage(&self) -> u32 {
        self.touch_damage.unwrap_or(2)
    }
}

/// Boss state-machine timers (seconds)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossAi {
    pub walk_time: Option<f32>,
    pub attack_time: Option<f32>,
}

impl BossAi {
    pub fn walk_time(&self) -> f32 {
        self.walk_time.unwrap_or(2.5)
    }

    pub fn attack_time(&self) -> f32 {
        self.attack_time.unwrap_or(1.8)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossFrames {
    pub idle: String,
    pub walk1: String,
    pub walk2: String,
    pub attack1: String,
    pub attack2: String,
    #[serde(default)]
    pub hurt: Option<String>,
}

impl BossFrames {
    pub fn frame(&self, pose: Pose) -> &str {
        match pose {
            Pose::Walk1 => &self.walk1,
            Pose::Walk2 => &self.walk2,
            Pose::Attack | Pose::Attack1 => &self.attack1,
            Pose::Attack2 => &self.attack2,
            Pose::Hurt => self.hurt.as_deref().unwrap_or(&self.idle),
            Pose::Idle | Pose::Jump => &self.idle,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BossManifest {
    pub id: String,
    #[serde(default)]
    pub frames: BossFrames,
    #[serde(default)]
    pub stats: BossStats,
    #[serde(default)]
    pub ai: BossAi,
}

impl BossManifest {
    pub fn named(id: &str) -> Self {
        let slot = |s: &str| format!("boss_{id}_{s}.png");
        Self {
            id: id.to_string(),
            frames: BossFrames {
                idle: slot("idle"),
                walk1: slot("walk1"),
                walk2: slot("walk2"),
                attack1: slot("attack1"),
                attack2: slot("attack2"),
                hurt: Some(slot("hurt")),
            },
            stats: BossStats::default(),
            ai: BossAi::default(),
        }
    }
}

/// Enemy and boss lookup tables keyed by manifest id
#[derive(Debug, Clone, Default)]
pub struct Registry {
    enemies: HashMap<String, EnemyManifest>,
    bosses: HashMap<String, BossManifest>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every shipped enemy and boss
    pub fn builtin() -> Self {
        let mut registry = Self::empty();

        let mut bobber = EnemyManifest::named("bobber");
        bobber.stats = EnemyStats {
            speed: Some(60.0),
            health: Some(3),
            touch_damage: Some(1),
        };
        registry.register_enemy(bobber);

        let mut king = BossManifest::named("king-bobber");
        king.stats = BossStats {
            max_health: Some(24),
            speed: Some(55.0),
            touch_damage: Some(2),
        };
        king.ai = BossAi {
            walk_time: Some(2.6),
            attack_time: Some(1.8),
        };
        registry.register_boss(king);

        registry
    }

    pub fn register_enemy(&mut self, manifest: EnemyManifest) {
        self.enemies.insert(manifest.id.clone(), manifest);
    }

    pub fn register_boss(&mut self, manifest: BossManifest) {
        self.bosses.insert(manifest.id.clone(), manifest);
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyManifest> {
        self.enemies.get(id)
    }

    pub fn boss(&self, id: &str) -> Option<&BossManifest> {
        self.bosses.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rosters_have_eight_heroes() {
        for habitat in Habitat::ALL {
            let heroes = roster(habitat);
            assert_eq!(heroes.len(), 8);
            assert!(heroes.iter().all(|h| h.habitat == habitat));
        }
    }

    #[test]
    fn test_hero_frame_paths() {
        let hero = find_character("snapper").unwrap();
        assert_eq!(hero.habitat, Habitat::Sea);
        assert_eq!(
            hero.frame_path(Pose::Walk2),
            "assets/characters/sea/char_snapper_walk2.png"
        );
        assert_eq!(hero.frames.frame(Pose::Attack), "char_snapper_attack.png");
        assert!(find_character("nobody").is_none());
    }

    #[test]
    fn test_missing_stats_fall_back_to_defaults() {
        let manifest: EnemyManifest = serde_json::from_str(r#"{ "id": "blob" }"#).unwrap();
        assert_eq!(manifest.stats.speed(), 60.0);
        assert_eq!(manifest.stats.health(), 3);
        assert_eq!(manifest.stats.touch_damage(), 1);

        let boss: BossManifest =
            serde_json::from_str(r#"{ "id": "big", "stats": { "speed": 70 } }"#).unwrap();
        assert_eq!(boss.stats.max_health(), 10);
        assert_eq!(boss.stats.speed(), 70.0);
        assert_eq!(boss.ai.walk_time(), 2.5);
        assert_eq!(boss.ai.attack_time(), 1.8);
    }

    #[test]
    fn test_manifest_camel_case_fields() {
        let boss: BossManifest = serde_json::from_str(
            r#"{ "id": "k", "stats": { "maxHealth": 5, "touchDamage": 3 }, "ai": { "walkTime": 1.0 } }"#,
        )
        .unwrap();
        assert_eq!(boss.stats.max_health(), 5);
        assert_eq!(boss.stats.touch_damage(), 3);
        assert_eq!(boss.ai.walk_time(), 1.0);
    }

    #[test]
    fn test_builtin_registry() {
        let registry = Registry::builtin();
        assert_eq!(registry.enemy("bobber").unwrap().stats.health(), 3);
        let king = registry.boss("king-bobber").unwrap();
        assert_eq!(king.stats.max_health(), 24);
        assert_eq!(king.ai.walk_time(), 2.6);
        assert!(registry.enemy("dragon").is_none());
    }

    #[test]
    fn test_boss_hurt_frame_falls_back_to_idle() {
        let mut boss = BossManifest::named("x");
        boss.frames.hurt = None;
        assert_eq!(boss.frames.frame(Pose::Hurt), "boss_x_idle.png");
    }

    #[test]
    fn test_habitat_serde_names() {
        let h: Habitat = serde_json::from_str("\"sea\"").unwrap();
        assert_eq!(h, Habitat::Sea);
    }
}
