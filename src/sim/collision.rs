//! Axis-aligned box collision helpers
//!
//! Every actor, platform and coin is an AABB in world space (y grows
//! downward). Overlap is half-open: boxes that only share an edge do not
//! intersect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Box for a feet-anchored entity: `feet` is the bottom-center point
    pub fn from_feet(feet: Vec2, size: Vec2) -> Self {
        Self {
            x: feet.x - size.x / 2.0,
            y: feet.y - size.y,
            w: size.x,
            h: size.y,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Half-open overlap test
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        intersects(self, other)
    }
}

/// True iff the boxes overlap on both axes. Touching edges do not count.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Point inside rectangle, edges inclusive
#[inline]
pub fn point_in_rect(p: Vec2, r: &Rect) -> bool {
    p.x >= r.x && p.x <= r.x + r.w && p.y >= r.y && p.y <= r.y + r.h
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_boxes_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_shared_edge_is_not_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!intersects(&a, &b));
        assert!(!intersects(&b, &a));

        // Same along the vertical axis
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!intersects(&a, &c));
    }

    #[test]
    fn test_from_feet() {
        let r = Rect::from_feet(Vec2::new(100.0, 200.0), Vec2::new(64.0, 64.0));
        assert_eq!(r, Rect::new(68.0, 136.0, 64.0, 64.0));
        assert_eq!(r.bottom(), 200.0);
    }

    #[test]
    fn test_point_in_rect_edges_inclusive() {
        let r = Rect::new(0.0, 0.0, 100.0, 20.0);
        assert!(point_in_rect(Vec2::new(100.0, 0.0), &r));
        assert!(point_in_rect(Vec2::new(0.0, 20.0), &r));
        assert!(!point_in_rect(Vec2::new(100.1, 0.0), &r));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.5f32..200.0, 0.5f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }

        #[test]
        fn prop_non_empty_box_intersects_itself(a in rect_strategy()) {
            prop_assert!(intersects(&a, &a));
        }

        #[test]
        fn prop_edge_neighbour_never_intersects(a in rect_strategy(), w in 0.5f32..200.0) {
            let right = Rect::new(a.x + a.w, a.y, w, a.h);
            prop_assert!(!intersects(&a, &right));
        }
    }
}
