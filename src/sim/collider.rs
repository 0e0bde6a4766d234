//! Polygon colliders and the separating-axis overlap test
//!
//! The tricky part of Prism Run: every active obstacle is tested against
//! the player every frame, so the polygons carry their projection axes
//! precomputed (boxes and hazard triangles never rotate in play, only
//! translate) and corner points are only rebuilt when a collider
//! actually moved.

use glam::Vec2;

/// Axis-aligned bounding rectangle, used for proximity gating and
/// screen-visibility tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_half(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Rectangle-intersection test (inclusive edges).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

/// A convex polygon as an ordered point list plus its unique projection
/// axes. Parallel edges contribute a single axis: rectangles carry 2,
/// triangles 3.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec2>,
    pub normals: Vec<Vec2>,
}

impl Polygon {
    /// Axis-aligned box: 4 corners in winding order from the top-left.
    pub fn rect(center: Vec2, half: Vec2) -> Self {
        Self {
            points: rect_points(center, half),
            normals: vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        }
    }

    /// Hazard triangle: bottom-left, apex, bottom-right (y-down coords).
    /// The silhouette is fixed, so the edge normals are computed once
    /// here and reused for the collider's whole lifetime.
    pub fn hazard_tri(center: Vec2, half: Vec2) -> Self {
        let points = tri_points(center, half);
        let normals = edge_normals(&points);
        Self { points, normals }
    }

    /// Bounding rectangle of the current point list.
    pub fn bounds(&self) -> Rect {
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Rect { min, max }
    }
}

fn rect_points(center: Vec2, half: Vec2) -> Vec<Vec2> {
    vec![
        Vec2::new(center.x - half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
        Vec2::new(center.x - half.x, center.y + half.y),
    ]
}

fn tri_points(center: Vec2, half: Vec2) -> Vec<Vec2> {
    vec![
        Vec2::new(center.x - half.x, center.y + half.y),
        Vec2::new(center.x, center.y - half.y),
        Vec2::new(center.x + half.x, center.y + half.y),
    ]
}

/// Perpendiculars of each edge. Axis orientation is irrelevant for the
/// interval test, so these are not re-derived on translation.
fn edge_normals(points: &[Vec2]) -> Vec<Vec2> {
    let mut normals = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let edge = q - *p;
        normals.push(Vec2::new(-edge.y, edge.x).normalize());
    }
    normals
}

/// Project a point list onto an axis, returning the scalar interval.
fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    let mut min = points[0].dot(axis);
    let mut max = min;
    for p in &points[1..] {
        let d = p.dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}

/// Separating-axis overlap test for two convex polygons.
///
/// Every unique edge normal of both shapes is a candidate separating
/// axis; the first axis whose projected intervals are disjoint proves
/// the shapes apart. No separating axis means they intersect.
pub fn overlaps(a: &Polygon, b: &Polygon) -> bool {
    for axis in a.normals.iter().chain(b.normals.iter()) {
        let (min_a, max_a) = project(&a.points, *axis);
        let (min_b, max_b) = project(&b.points, *axis);
        if max_a < min_b || max_b < min_a {
            return false;
        }
    }
    true
}

/// Collider shape tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Box,
    Triangle,
}

/// A positioned collider: polygon + cached size + activation gate.
///
/// `active` is toggled per frame by the proximity gate in the tick;
/// inactive colliders are skipped by every collision query.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    pub polygon: Polygon,
    pub half: Vec2,
    pub active: bool,
    center: Vec2,
}

impl Collider {
    pub fn rect(center: Vec2, half: Vec2) -> Self {
        Self {
            shape: Shape::Box,
            polygon: Polygon::rect(center, half),
            half,
            active: false,
            center,
        }
    }

    pub fn hazard_tri(center: Vec2, half: Vec2) -> Self {
        Self {
            shape: Shape::Triangle,
            polygon: Polygon::hazard_tri(center, half),
            half,
            active: false,
            center,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Reposition the collider, rebuilding corner points from center +
    /// half-extents only when the center actually changed. Repeated
    /// calls with an unchanged center leave the point list untouched.
    pub fn set_center(&mut self, center: Vec2) {
        if center == self.center {
            return;
        }
        self.center = center;
        self.polygon.points = match self.shape {
            Shape::Box => rect_points(center, self.half),
            Shape::Triangle => tri_points(center, self.half),
        };
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_half(self.center, self.half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn overlapping_boxes_collide() {
        let a = Polygon::rect(Vec2::new(0.0, 0.0), Vec2::splat(16.0));
        let b = Polygon::rect(Vec2::new(20.0, 10.0), Vec2::splat(16.0));
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn separated_boxes_do_not_collide() {
        let a = Polygon::rect(Vec2::new(0.0, 0.0), Vec2::splat(16.0));
        let b = Polygon::rect(Vec2::new(100.0, 0.0), Vec2::splat(16.0));
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn box_beside_triangle_misses_on_diagonal_axis() {
        // Box sits up-right of the triangle's hypotenuse region: their
        // bounding rects overlap but the diagonal edge axis separates them.
        let tri = Polygon::hazard_tri(Vec2::new(0.0, 0.0), Vec2::splat(16.0));
        let b = Polygon::rect(Vec2::new(24.0, -24.0), Vec2::splat(8.0));
        assert!(!overlaps(&tri, &b));
    }

    #[test]
    fn box_resting_on_triangle_tip_collides() {
        let tri = Polygon::hazard_tri(Vec2::new(0.0, 0.0), Vec2::splat(16.0));
        let b = Polygon::rect(Vec2::new(0.0, -20.0), Vec2::splat(8.0));
        assert!(overlaps(&tri, &b));
    }

    #[test]
    fn set_center_is_idempotent() {
        let mut c = Collider::rect(Vec2::new(10.0, 20.0), Vec2::splat(16.0));
        c.set_center(Vec2::new(50.0, 20.0));
        let snapshot = c.polygon.points.clone();
        c.set_center(Vec2::new(50.0, 20.0));
        assert_eq!(c.polygon.points, snapshot);
    }

    #[test]
    fn set_center_moves_all_points() {
        let mut c = Collider::hazard_tri(Vec2::new(0.0, 0.0), Vec2::splat(16.0));
        let before = c.polygon.points.clone();
        let normals_before = c.polygon.normals.clone();
        c.set_center(Vec2::new(32.0, -8.0));
        for (p, q) in before.iter().zip(&c.polygon.points) {
            assert_eq!(*q - *p, Vec2::new(32.0, -8.0));
        }
        // Translation never touches the precomputed axes
        assert_eq!(c.polygon.normals, normals_before);
    }

    #[test]
    fn triangle_has_three_axes_box_has_two() {
        let tri = Polygon::hazard_tri(Vec2::ZERO, Vec2::splat(16.0));
        let rect = Polygon::rect(Vec2::ZERO, Vec2::splat(16.0));
        assert_eq!(tri.normals.len(), 3);
        assert_eq!(rect.normals.len(), 2);
    }

    fn arb_polygon() -> impl Strategy<Value = Polygon> {
        (
            any::<bool>(),
            -200.0f32..200.0,
            -200.0f32..200.0,
            4.0f32..40.0,
            4.0f32..40.0,
        )
            .prop_map(|(is_box, x, y, hx, hy)| {
                let center = Vec2::new(x, y);
                let half = Vec2::new(hx, hy);
                if is_box {
                    Polygon::rect(center, half)
                } else {
                    Polygon::hazard_tri(center, half)
                }
            })
    }

    proptest! {
        #[test]
        fn sat_is_symmetric(a in arb_polygon(), b in arb_polygon()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn disjoint_bounds_never_collide(a in arb_polygon(), b in arb_polygon()) {
            if !a.bounds().intersects(&b.bounds()) {
                prop_assert!(!overlaps(&a, &b));
            }
        }

        #[test]
        fn shape_overlaps_itself(a in arb_polygon()) {
            prop_assert!(overlaps(&a, &a));
        }
    }
}
