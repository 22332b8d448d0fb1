//! Turns the menu tree into a flat list of draw primitives.
//!
//! Order matters: ring sectors first (back to front by depth), node outlines
//! next, lifted copies last so they sit on top of everything.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use indextree::NodeId;

use crate::activation::is_open;
use crate::drag::LiftedCopy;
use crate::geometry::polar_to_screen;
use crate::layout::RingLayout;
use crate::node::{MenuNode, Rgba, ShapeKind};
use crate::tree::MenuTree;

/// Alpha applied to node outlines
pub const DEFAULT_NODE_ALPHA: u8 = 75;

/// Segments per half turn when tessellating arcs
pub const ARC_SEGMENTS: usize = 48;

/// Annular sector in screen space; angles follow [`polar_to_screen`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub start_angle: f32,
    pub end_angle: f32,
    pub color: Rgba,
}

impl Sector {
    /// Upper half-disk around `center`.
    pub fn half_disk(center: Vec2, radius: f32, color: Rgba) -> Self {
        Self {
            center,
            inner_radius: 0.0,
            outer_radius: radius,
            start_angle: 0.0,
            end_angle: PI,
            color,
        }
    }

    /// Closed outline: outer arc from start to end, then the inner arc back
    /// (or the centre when the sector has no hole).
    pub fn outline(&self, segments: usize) -> Vec<Vec2> {
        let segments = segments.max(1);
        let step = (self.end_angle - self.start_angle) / segments as f32;

        let mut points: Vec<Vec2> = (0..=segments)
            .map(|i| polar_to_screen(self.center, self.outer_radius, self.start_angle + step * i as f32))
            .collect();

        if self.inner_radius > 0.0 {
            points.extend(
                (0..=segments)
                    .rev()
                    .map(|i| polar_to_screen(self.center, self.inner_radius, self.start_angle + step * i as f32)),
            );
        } else {
            points.push(self.center);
        }
        points
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawPrimitive {
    Sector(Sector),
    Circle { center: Vec2, radius: f32, color: Rgba },
    Polygon { points: Vec<Vec2>, color: Rgba },
}

impl DrawPrimitive {
    pub fn color(&self) -> Rgba {
        match self {
            DrawPrimitive::Sector(sector) => sector.color,
            DrawPrimitive::Circle { color, .. } | DrawPrimitive::Polygon { color, .. } => *color,
        }
    }

    /// Outline as a polygon, for hosts that can only fill polygons.
    pub fn points(&self, segments: usize) -> Vec<Vec2> {
        match self {
            DrawPrimitive::Sector(sector) => sector.outline(segments),
            DrawPrimitive::Circle { center, radius, .. } => {
                let segments = (segments * 2).max(3);
                (0..segments)
                    .map(|i| polar_to_screen(*center, *radius, TAU * i as f32 / segments as f32))
                    .collect()
            }
            DrawPrimitive::Polygon { points, .. } => points.clone(),
        }
    }
}

/// Primitive for a single node outline.
pub fn node_primitive(node: &MenuNode, color: Rgba) -> DrawPrimitive {
    match node.shape() {
        ShapeKind::Circle => DrawPrimitive::Circle {
            center: node.origin(),
            radius: node.radius(),
            color,
        },
        ShapeKind::Polygon(_) => DrawPrimitive::Polygon {
            points: node.vertices().collect(),
            color,
        },
    }
}

/// Alpha of one ring sector; stacked sectors build the depth gradient.
pub fn level_alpha(max_depth: usize) -> u8 {
    if max_depth == 0 {
        255
    } else {
        (255 / max_depth) as u8
    }
}

/// Labels of the nodes currently shown, with their positions. Empty labels
/// are skipped.
pub fn visible_labels(tree: &MenuTree) -> Vec<(Vec2, &str)> {
    fn collect<'t>(tree: &'t MenuTree, id: NodeId, out: &mut Vec<(Vec2, &'t str)>) {
        let Some(node) = tree.node(id) else {
            return;
        };
        if !node.label().is_empty() {
            out.push((node.origin(), node.label()));
        }
        if is_open(tree, id) {
            for child in tree.children(id) {
                collect(tree, child, out);
            }
        }
    }

    let mut out = Vec::new();
    collect(tree, tree.root(), &mut out);
    out
}

/// Everything needed to paint one frame.
pub struct Scene<'a> {
    pub tree: &'a MenuTree,
    pub layout: &'a RingLayout,
    pub max_depth: usize,
    pub node_alpha: u8,
    pub lifted: &'a [LiftedCopy],
}

impl Scene<'_> {
    pub fn primitives(&self) -> Vec<DrawPrimitive> {
        let mut out = Vec::new();
        let root = self.tree.root();

        if let Some(root_node) = self.tree.node(root) {
            let color = root_node.color().with_alpha(level_alpha(self.max_depth));
            self.push_levels(root, 0, color, &mut out);
        }
        self.push_nodes(root, &mut out);

        for copy in self.lifted {
            out.push(node_primitive(&copy.node, copy.node.color()));
        }
        out
    }

    /// One half-disk per open internal node, reaching the outer edge of the
    /// ring its children live in.
    fn push_levels(&self, id: NodeId, depth: usize, color: Rgba, out: &mut Vec<DrawPrimitive>) {
        if !is_open(self.tree, id) || !self.tree.has_children(id) {
            return;
        }
        let radius = self.layout.ring_width * (depth + 2) as f32;
        out.push(DrawPrimitive::Sector(Sector::half_disk(self.layout.origin, radius, color)));

        for child in self.tree.children(id) {
            self.push_levels(child, depth + 1, color, out);
        }
    }

    fn push_nodes(&self, id: NodeId, out: &mut Vec<DrawPrimitive>) {
        let Some(node) = self.tree.node(id) else {
            return;
        };
        out.push(node_primitive(node, node.color().with_alpha(self.node_alpha)));

        if is_open(self.tree, id) {
            for child in self.tree.children(id) {
                self.push_nodes(child, out);
            }
        }
    }
}
