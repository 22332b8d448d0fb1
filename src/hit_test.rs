//! Point-in-shape predicates for menu nodes and rings.
//!
//! All comparisons happen in pixel space; normalized points are scaled by the
//! viewport first.

use glam::Vec2;

use crate::geometry::{CoordSpace, Viewport};
use crate::node::{MenuNode, ShapeKind};

/// True if the pixel-space `point` lies inside the node's outline.
pub fn contains(node: &MenuNode, point: Vec2) -> bool {
    match node.shape() {
        ShapeKind::Circle => point.distance(node.origin()) <= node.radius(),
        ShapeKind::Polygon(_) => {
            let vertices: Vec<Vec2> = node.vertices().collect();
            point_in_polygon(point, &vertices)
        }
    }
}

/// Same as [`contains`] for a point given as a fraction of the viewport.
pub fn contains_normalized(node: &MenuNode, point: Vec2, viewport: &Viewport) -> bool {
    contains(node, viewport.to_pixels(point, CoordSpace::Normalized))
}

/// Even-odd ray casting. Edges without vertical extent never cross the ray,
/// so coincident vertices and horizontal edges are skipped instead of
/// dividing by zero.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        j = i;

        let span = vj.y - vi.y;
        if span == 0.0 {
            continue;
        }

        let straddles = (vi.y <= point.y && point.y < vj.y) || (vj.y <= point.y && point.y < vi.y);
        if straddles {
            let crossing_x = vi.x + (vj.x - vi.x) * (point.y - vi.y) / span;
            if point.x < crossing_x {
                inside = !inside;
            }
        }
    }
    inside
}

/// True iff the distance from `center` lies strictly inside ring `depth`.
pub fn is_point_inside_ring(center: Vec2, point: Vec2, depth: usize, ring_width: f32) -> bool {
    let distance = point.distance(center);
    let inner = depth as f32 * ring_width;
    let outer = (depth + 1) as f32 * ring_width;
    distance > inner && distance < outer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Category, Rgba};

    fn placed(category: Category, origin: Vec2, radius: f32) -> MenuNode {
        let mut node = MenuNode::new(category, Rgba::WHITE);
        node.set_radius(radius);
        node.move_to(origin);
        node
    }

    #[test]
    fn test_circle_contains_center() {
        for radius in [0.5, 1.0, 20.0, 400.0] {
            let node = placed(Category::None, Vec2::new(123.0, 456.0), radius);
            assert!(contains(&node, node.origin()));
        }
    }

    #[test]
    fn test_circle_boundary() {
        let node = placed(Category::None, Vec2::new(100.0, 100.0), 10.0);
        assert!(contains(&node, Vec2::new(110.0, 100.0)));
        assert!(!contains(&node, Vec2::new(110.5, 100.0)));
    }

    #[test]
    fn test_polygons_contain_center_not_far_points() {
        for category in [Category::Drums, Category::Bass, Category::Lead] {
            let node = placed(category, Vec2::new(300.0, 300.0), 40.0);
            assert!(contains(&node, Vec2::new(300.0, 300.0)), "{:?}", category);
            assert!(!contains(&node, Vec2::new(300.0, 345.0)), "{:?}", category);
            assert!(!contains(&node, Vec2::new(0.0, 0.0)), "{:?}", category);
        }
    }

    #[test]
    fn test_square_is_diamond() {
        // Vertices at 90, 180, 270, 360 degrees: a diamond
        let node = placed(Category::Drums, Vec2::ZERO, 10.0);
        assert!(contains(&node, Vec2::new(4.0, 4.0)));
        assert!(!contains(&node, Vec2::new(6.0, 6.0)));
    }

    #[test]
    fn test_contains_normalized() {
        let viewport = Viewport::new(1000.0, 800.0);
        let node = placed(Category::Lead, Vec2::new(500.0, 400.0), 30.0);
        assert!(contains_normalized(&node, Vec2::new(0.5, 0.5), &viewport));
        assert!(!contains_normalized(&node, Vec2::new(0.1, 0.1), &viewport));
    }

    #[test]
    fn test_degenerate_polygons() {
        // Zero radius collapses every vertex onto the origin
        let node = placed(Category::Bass, Vec2::new(50.0, 50.0), 0.0);
        assert!(!contains(&node, Vec2::new(50.0, 50.0)));

        let flat = [Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0), Vec2::new(20.0, 5.0)];
        assert!(!point_in_polygon(Vec2::new(10.0, 5.0), &flat));

        let repeated = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &repeated));

        assert!(!point_in_polygon(Vec2::ZERO, &[]));
    }

    #[test]
    fn test_ring_band_is_open_interval() {
        let center = Vec2::new(500.0, 800.0);
        assert!(is_point_inside_ring(center, Vec2::new(500.0, 650.0), 1, 100.0));
        assert!(!is_point_inside_ring(center, Vec2::new(500.0, 700.0), 1, 100.0));
        assert!(!is_point_inside_ring(center, Vec2::new(500.0, 600.0), 1, 100.0));
        assert!(is_point_inside_ring(center, Vec2::new(500.0, 750.0), 0, 100.0));
        assert!(!is_point_inside_ring(center, center, 0, 100.0));
    }
}
