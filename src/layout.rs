use std::f32::consts::PI;

use glam::Vec2;
use indextree::NodeId;

use crate::geometry::polar_to_screen;
use crate::tree::MenuTree;

/// Fraction of the ring width used as node radius
pub const NODE_RADIUS_RATIO: f32 = 0.4;

/// Ring geometry of a stacked half-pie menu anchored at `origin`.
///
/// Depth `d` owns the band between `d * ring_width` and
/// `(d + 1) * ring_width`; children of a depth-`d` node sit in band `d + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub origin: Vec2,
    pub ring_width: f32,
    pub radius_ratio: f32,
}

impl RingLayout {
    pub fn new(origin: Vec2, ring_width: f32) -> Self {
        Self {
            origin,
            ring_width,
            radius_ratio: NODE_RADIUS_RATIO,
        }
    }

    pub fn with_radius_ratio(mut self, radius_ratio: f32) -> Self {
        self.radius_ratio = radius_ratio;
        self
    }

    /// Distance from the origin to the middle of ring `depth`.
    pub fn ring_center_distance(&self, depth: usize) -> f32 {
        self.ring_width * depth as f32 + self.ring_width * 0.5
    }

    pub fn node_radius(&self) -> f32 {
        self.ring_width * self.radius_ratio
    }

    /// Angular slot for `count` children: half a turn split into `count + 1` gaps.
    pub fn slot_angle(count: usize) -> f32 {
        debug_assert!(count > 0, "slot angle requested for a childless node");
        PI / (count + 1) as f32
    }

    /// Place the children of `node` (which lives at ring `depth - 1`) into ring
    /// `depth`, then recurse. Childless nodes are left untouched.
    pub fn place(&self, tree: &mut MenuTree, node: NodeId, depth: usize) {
        // Collect children first (to avoid borrow issues)
        let children: Vec<NodeId> = tree.children(node).collect();
        if children.is_empty() {
            return;
        }

        let slot = Self::slot_angle(children.len());
        let distance = self.ring_center_distance(depth);
        let radius = self.node_radius();

        for (i, child) in children.iter().enumerate() {
            let position = polar_to_screen(self.origin, distance, slot * (i + 1) as f32);
            if let Some(child_node) = tree.node_mut(*child) {
                child_node.move_to(position);
                child_node.set_radius(radius);
            }
            self.place(tree, *child, depth + 1);
        }
    }
}
