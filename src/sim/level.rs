//! Level descriptor and static terrain
//!
//! Levels arrive as JSON:
//! `{ playerStart:{x,y}, platforms:[{x,y,w,h,type}], coins:[{x,y}],
//!    enemies:[{type,x,y}], boss:{id,x,y} }`

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::Rect;
use super::manifest::Habitat;
use super::quadtree::Quadtree;
use crate::consts::LEVEL_COUNT;

/// Errors from loading a level descriptor
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid level JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level has no platforms")]
    NoPlatforms,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(rename = "type", default = "default_platform_kind")]
    pub kind: String,
}

fn default_platform_kind() -> String {
    "ground".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSpawn {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    pub player_start: Point,
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub coins: Vec<Point>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    /// Absent means the level has no boss
    #[serde(default)]
    pub boss: Option<BossSpawn>,
}

impl LevelDescriptor {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelDescriptor = serde_json::from_str(json)?;
        if level.platforms.is_empty() {
            return Err(LevelError::NoPlatforms);
        }
        Ok(level)
    }

    /// Right-most platform edge and lowest platform top
    pub fn extent(&self) -> (f32, f32) {
        self.platforms.iter().fold((0.0f32, 0.0f32), |(w, h), p| {
            (w.max(p.x + p.w), h.max(p.y))
        })
    }
}

/// Sample level shipped with the crate (land 01)
pub const BUNDLED_LEVEL: &str = include_str!("../../levels/land_01.json");

/// Asset path of a level in a habitat's pool (`index` is 1-based)
pub fn level_path(habitat: Habitat, index: u32) -> String {
    format!("assets/levels/{}/{:02}.json", habitat.as_str(), index)
}

/// Random level from the habitat's pool
pub fn pick_level_path<R: Rng>(habitat: Habitat, rng: &mut R) -> String {
    let index = rng.random_range(1..=LEVEL_COUNT);
    level_path(habitat, index)
}

/// Static axis-aligned platform. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    /// Tile style ("ground", "ice", ...)
    pub kind: String,
}

impl Platform {
    pub fn new(x: f32, y: f32, w: f32, h: f32, kind: &str) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind: kind.to_string(),
        }
    }
}

impl From<&PlatformDef> for Platform {
    fn from(def: &PlatformDef) -> Self {
        Platform::new(def.x, def.y, def.w, def.h, &def.kind)
    }
}

/// Read-only platform lookup used by actors
pub trait Terrain {
    /// Platforms that may overlap `area`, in level order. May include
    /// platforms that don't overlap; never omits one that does.
    fn candidates(&self, area: &Rect) -> Vec<&Platform>;

    fn all(&self) -> &[Platform];
}

impl Terrain for [Platform] {
    fn candidates(&self, _area: &Rect) -> Vec<&Platform> {
        self.iter().collect()
    }

    fn all(&self) -> &[Platform] {
        self
    }
}

impl Terrain for Vec<Platform> {
    fn candidates(&self, area: &Rect) -> Vec<&Platform> {
        self.as_slice().candidates(area)
    }

    fn all(&self) -> &[Platform] {
        self
    }
}

/// Platforms plus a quadtree over their boxes
#[derive(Debug, Clone)]
pub struct PlatformIndex {
    platforms: Vec<Platform>,
    tree: Quadtree<usize>,
}

impl PlatformIndex {
    pub fn new(platforms: Vec<Platform>) -> Self {
        let bounds = platforms
            .iter()
            .map(|p| p.rect)
            .reduce(|a, b| {
                let x = a.x.min(b.x);
                let y = a.y.min(b.y);
                Rect::new(x, y, a.right().max(b.right()) - x, a.bottom().max(b.bottom()) - y)
            })
            .unwrap_or_default();
        let mut tree = Quadtree::new(bounds);
        for (i, p) in platforms.iter().enumerate() {
            tree.insert(p.rect, i);
        }
        Self { platforms, tree }
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

impl Terrain for PlatformIndex {
    fn candidates(&self, area: &Rect) -> Vec<&Platform> {
        let mut indices = self.tree.retrieve(area);
        indices.sort_unstable();
        indices.into_iter().map(|i| &self.platforms[i]).collect()
    }

    fn all(&self) -> &[Platform] {
        &self.platforms
    }
}
