//! Composition root: owns the tree, routes pointer input, emits primitives.

use glam::Vec2;
use indextree::NodeId;
use tracing::{debug, info, trace};

use crate::activation;
use crate::catalog::Catalog;
use crate::config::MenuConfig;
use crate::error::ConfigError;
use crate::drag::{DragController, LiftedCopy, PointerId, ReleasePolicy};
use crate::geometry::{CoordSpace, Viewport};
use crate::input::{PointerEvent, PointerPhase, MOUSE_POINTER};
use crate::layout::RingLayout;
use crate::render::{DrawPrimitive, Scene};
use crate::tree::MenuTree;

pub struct MenuEngine {
    tree: MenuTree,
    config: MenuConfig,
    viewport: Viewport,
    layout: RingLayout,
    max_depth: usize,
    drag: DragController,
}

impl MenuEngine {
    /// Take ownership of `tree`, cache its depth and lay it out.
    pub fn new(tree: MenuTree, config: MenuConfig, viewport: Viewport) -> Self {
        let max_depth = tree.max_depth(tree.root());
        let origin = config.anchor.resolve(&viewport);
        let layout = RingLayout::new(origin, config.ring_width).with_radius_ratio(config.node_radius_ratio);
        let drag = DragController::new(config.drag_policy, config.max_lifted);

        let mut engine = Self {
            tree,
            config,
            viewport,
            layout,
            max_depth,
            drag,
        };
        engine.reset();
        info!(
            nodes = engine.tree.node_count(),
            max_depth,
            ring_width = engine.config.ring_width,
            "menu set up"
        );
        engine
    }

    /// Engine for a loaded catalog; a ring width named by the catalog wins
    /// over the configured one.
    pub fn from_catalog(catalog: Catalog, mut config: MenuConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        if let Some(ring_width) = catalog.ring_width {
            config.ring_width = ring_width;
        }
        config.validate()?;
        Ok(Self::new(catalog.tree, config, viewport))
    }

    /// Menu rooted at `origin` until the host reports its real size. The
    /// origin is taken as the bottom centre of the surface, so a later
    /// [`resize`](Self::resize) re-anchors it like any other reset.
    pub fn setup(tree: MenuTree, origin: Vec2, ring_width: f32) -> Self {
        let config = MenuConfig {
            ring_width,
            ..MenuConfig::default()
        };
        let viewport = Viewport::new(origin.x * 2.0, origin.y);
        Self::new(tree, config, viewport)
    }

    /// Re-anchor the root and lay the tree out again.
    pub fn reset(&mut self) {
        let origin = self.config.anchor.resolve(&self.viewport);
        self.layout = RingLayout::new(origin, self.config.ring_width).with_radius_ratio(self.config.node_radius_ratio);

        let root = self.tree.root();
        if let Some(node) = self.tree.node_mut(root) {
            node.move_to(origin);
            node.set_radius(self.config.ring_width);
        }
        self.layout.place(&mut self.tree, root, 1);

        let ids: Vec<NodeId> = self.tree.descendants(root).collect();
        for id in ids {
            if let Some(node) = self.tree.node_mut(id) {
                let position = node.origin();
                node.set_origin_init(position, CoordSpace::Pixels, &self.viewport);
            }
        }
        debug!(x = origin.x, y = origin.y, "menu reset");
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.reset();
    }

    /// Returns whether the press landed on the open menu.
    pub fn handle_pointer_down(&mut self, point: Vec2, space: CoordSpace, pointer_id: PointerId) -> bool {
        let point = self.viewport.to_pixels(point, space);
        let consumed = activation::is_point_inside_active_menu(&self.tree, &self.layout, point);

        let outcome = activation::dispatch_click(&mut self.tree, &self.layout, point);
        trace!(?outcome, pointer_id, "pointer down");
        if let Some(id) = outcome.activated().filter(|id| !self.tree.has_children(*id)) {
            self.drag.lift(&self.tree, id, point, pointer_id);
        }
        consumed
    }

    /// Returns whether a lifted copy moved or the point is on the open menu.
    pub fn handle_pointer_move(&mut self, point: Vec2, space: CoordSpace, pointer_id: PointerId) -> bool {
        let point = self.viewport.to_pixels(point, space);
        let inside = activation::is_point_inside_active_menu(&self.tree, &self.layout, point);
        let moved = self.drag.drag(point, pointer_id);
        moved || inside
    }

    /// Copies released by this pointer, per the release policy. The
    /// pointer's own copies land on `point`; others are left alone.
    pub fn handle_pointer_up(&mut self, point: Vec2, space: CoordSpace, pointer_id: PointerId) -> Vec<LiftedCopy> {
        let point = self.viewport.to_pixels(point, space);
        self.drag.follow(point, pointer_id);
        match self.config.release_policy {
            ReleasePolicy::OnPointerUp => self.drag.release(pointer_id),
            ReleasePolicy::Manual => {
                self.drag.drop_held(pointer_id);
                Vec::new()
            }
        }
    }

    /// Dispatch on the event phase. Returns whether the event was consumed;
    /// released copies of an `Up` are handed back through the second field.
    pub fn handle(&mut self, event: PointerEvent) -> (bool, Vec<LiftedCopy>) {
        match event.phase {
            PointerPhase::Down => (
                self.handle_pointer_down(event.position, event.space, event.pointer_id),
                Vec::new(),
            ),
            PointerPhase::Move => (
                self.handle_pointer_move(event.position, event.space, event.pointer_id),
                Vec::new(),
            ),
            PointerPhase::Up => {
                let released = self.handle_pointer_up(event.position, event.space, event.pointer_id);
                (!released.is_empty(), released)
            }
        }
    }

    pub fn mouse_pressed(&mut self, x: f32, y: f32) -> bool {
        self.handle_pointer_down(Vec2::new(x, y), CoordSpace::Pixels, MOUSE_POINTER)
    }

    pub fn mouse_dragged(&mut self, x: f32, y: f32) -> bool {
        self.handle_pointer_move(Vec2::new(x, y), CoordSpace::Pixels, MOUSE_POINTER)
    }

    pub fn mouse_released(&mut self, x: f32, y: f32) -> Vec<LiftedCopy> {
        self.handle_pointer_up(Vec2::new(x, y), CoordSpace::Pixels, MOUSE_POINTER)
    }

    pub fn touch_down(&mut self, x: f32, y: f32, id: PointerId) -> bool {
        self.handle_pointer_down(Vec2::new(x, y), CoordSpace::Normalized, id)
    }

    pub fn touch_moved(&mut self, x: f32, y: f32, id: PointerId) -> bool {
        self.handle_pointer_move(Vec2::new(x, y), CoordSpace::Normalized, id)
    }

    pub fn touch_up(&mut self, x: f32, y: f32, id: PointerId) -> Vec<LiftedCopy> {
        self.handle_pointer_up(Vec2::new(x, y), CoordSpace::Normalized, id)
    }

    pub fn draw(&self) -> Vec<DrawPrimitive> {
        Scene {
            tree: &self.tree,
            layout: &self.layout,
            max_depth: self.max_depth,
            node_alpha: self.config.node_alpha,
            lifted: self.drag.lifted(),
        }
        .primitives()
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn dragged_nodes(&self) -> &[LiftedCopy] {
        self.drag.lifted()
    }

    pub fn take_dragged(&mut self) -> Vec<LiftedCopy> {
        self.drag.take_all()
    }

    pub fn clear_dragged(&mut self) {
        self.drag.clear();
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn layout(&self) -> &RingLayout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }
}
