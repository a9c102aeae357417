//! Quadrant tree for broad-phase culling
//!
//! Items that straddle a node's split lines stay in that node. `retrieve`
//! may return false positives (callers re-check exact overlap) but never
//! misses an item whose box overlaps the query area.

use super::collision::Rect;

pub const DEFAULT_MAX_OBJECTS: usize = 8;
pub const DEFAULT_MAX_LEVELS: u32 = 5;

/// Quadrant of a split node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    NorthEast = 0,
    NorthWest = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::NorthWest,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];
}

#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    bounds: Rect,
    max_objects: usize,
    max_levels: u32,
    level: u32,
    objects: Vec<(Rect, T)>,
    nodes: Option<Box<[Quadtree<T>; 4]>>,
}

impl<T: Clone> Quadtree<T> {
    pub fn new(bounds: Rect) -> Self {
        Self::with_limits(bounds, DEFAULT_MAX_OBJECTS, DEFAULT_MAX_LEVELS)
    }

    pub fn with_limits(bounds: Rect, max_objects: usize, max_levels: u32) -> Self {
        Self::node(bounds, max_objects, max_levels, 0)
    }

    fn node(bounds: Rect, max_objects: usize, max_levels: u32, level: u32) -> Self {
        Self {
            bounds,
            max_objects,
            max_levels,
            level,
            objects: Vec::new(),
            nodes: None,
        }
    }

    /// Depth of the deepest node (root = 0)
    pub fn depth(&self) -> u32 {
        match &self.nodes {
            Some(nodes) => nodes.iter().map(|n| n.depth()).max().unwrap_or(self.level),
            None => self.level,
        }
    }

    /// Number of items stored in the whole tree
    pub fn len(&self) -> usize {
        self.objects.len()
            + self
                .nodes
                .as_ref()
                .map(|nodes| nodes.iter().map(|n| n.len()).sum())
                .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn split(&mut self) {
        let Rect { x, y, w, h } = self.bounds;
        let hw = w * 0.5;
        let hh = h * 0.5;
        let lvl = self.level + 1;
        let (mo, ml) = (self.max_objects, self.max_levels);
        self.nodes = Some(Box::new([
            Self::node(Rect::new(x + hw, y, hw, hh), mo, ml, lvl),
            Self::node(Rect::new(x, y, hw, hh), mo, ml, lvl),
            Self::node(Rect::new(x, y + hh, hw, hh), mo, ml, lvl),
            Self::node(Rect::new(x + hw, y + hh, hw, hh), mo, ml, lvl),
        ]));
    }

    /// Child quadrant fully containing `rect`, or None if it straddles
    fn quadrant(&self, rect: &Rect) -> Option<Quadrant> {
        let vertical_mid = self.bounds.x + self.bounds.w * 0.5;
        let horizontal_mid = self.bounds.y + self.bounds.h * 0.5;

        let top = rect.y < horizontal_mid && rect.bottom() < horizontal_mid;
        let bottom = rect.y > horizontal_mid;
        let left = rect.x < vertical_mid && rect.right() < vertical_mid;
        let right = rect.x > vertical_mid;

        if left {
            if top {
                return Some(Quadrant::NorthWest);
            }
            if bottom {
                return Some(Quadrant::SouthWest);
            }
        } else if right {
            if top {
                return Some(Quadrant::NorthEast);
            }
            if bottom {
                return Some(Quadrant::SouthEast);
            }
        }
        None
    }

    pub fn insert(&mut self, rect: Rect, item: T) {
        if let Some(q) = self.quadrant(&rect) {
            if let Some(nodes) = self.nodes.as_mut() {
                nodes[q as usize].insert(rect, item);
                return;
            }
        }

        self.objects.push((rect, item));

        if self.objects.len() > self.max_objects && self.level < self.max_levels {
            if self.nodes.is_none() {
                self.split();
            }

            let mut i = 0;
            while i < self.objects.len() {
                match self.quadrant(&self.objects[i].0) {
                    Some(q) => {
                        let (r, it) = self.objects.remove(i);
                        if let Some(nodes) = self.nodes.as_mut() {
                            nodes[q as usize].insert(r, it);
                        }
                    }
                    None => i += 1,
                }
            }
        }
    }

    /// Candidates that may overlap `area`
    pub fn retrieve(&self, area: &Rect) -> Vec<T> {
        let mut out = Vec::new();
        self.retrieve_into(area, &mut out);
        out
    }

    fn retrieve_into(&self, area: &Rect, out: &mut Vec<T>) {
        if let Some(nodes) = &self.nodes {
            match self.quadrant(area) {
                Some(q) => nodes[q as usize].retrieve_into(area, out),
                None => {
                    // Straddling query: descend into every child whose items it can reach
                    for q in Quadrant::ALL {
                        if self.may_hold(q, area) {
                            nodes[q as usize].retrieve_into(area, out);
                        }
                    }
                }
            }
        }
        out.extend(self.objects.iter().map(|(_, item)| item.clone()));
    }

    /// Whether `area` can overlap anything stored in child `q`. Children only
    /// hold items strictly on their side of both split lines, which may
    /// extend past the node bounds.
    fn may_hold(&self, q: Quadrant, area: &Rect) -> bool {
        let vertical_mid = self.bounds.x + self.bounds.w * 0.5;
        let horizontal_mid = self.bounds.y + self.bounds.h * 0.5;
        let west = area.x < vertical_mid;
        let east = area.right() > vertical_mid;
        let north = area.y < horizontal_mid;
        let south = area.bottom() > horizontal_mid;
        match q {
            Quadrant::NorthEast => east && north,
            Quadrant::NorthWest => west && north,
            Quadrant::SouthWest => west && south,
            Quadrant::SouthEast => east && south,
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.nodes = None;
    }
}
