//! Activation state of the menu: which branches are expanded.
//!
//! The root is always treated as open. Below it, a node's active flag decides
//! whether its children are shown and reachable by clicks. Activating a node
//! closes every sibling along the way, so each node has at most one active
//! child. A closed sibling keeps the state below it, and reopening it shows
//! the branch that was open before.

use glam::Vec2;
use indextree::NodeId;
use tracing::{debug, trace};

use crate::hit_test;
use crate::layout::RingLayout;
use crate::tree::MenuTree;

/// What a click did to the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A node's outline claimed the point and is now active
    Activated(NodeId),
    /// Nothing was hit, but the point fell on an open ring; state unchanged
    MissInsideMenu,
    /// Nothing was hit outside the open rings; the whole menu collapsed
    MissOutsideMenu,
}

impl ClickOutcome {
    pub fn activated(&self) -> Option<NodeId> {
        match self {
            ClickOutcome::Activated(id) => Some(*id),
            _ => None,
        }
    }
}

/// Whether the children of `id` are shown.
pub fn is_open(tree: &MenuTree, id: NodeId) -> bool {
    id == tree.root() || tree.node(id).is_some_and(|n| n.is_active())
}

/// Full click handling: activate the hit node, or collapse the menu when the
/// point lands outside every open ring.
pub fn dispatch_click(tree: &mut MenuTree, layout: &RingLayout, point: Vec2) -> ClickOutcome {
    let root = tree.root();
    if let Some(hit) = activate_on_click(tree, root, point) {
        return ClickOutcome::Activated(hit);
    }

    if is_point_inside_active_menu(tree, layout, point) {
        trace!(x = point.x, y = point.y, "click on open ring, nothing hit");
        ClickOutcome::MissInsideMenu
    } else {
        debug!(x = point.x, y = point.y, "click outside menu, collapsing");
        deactivate_all(tree, root);
        ClickOutcome::MissOutsideMenu
    }
}

/// Depth-first search from `node`: the node's own outline is tested before
/// its children, and children are only searched when the node is open. The
/// first node containing `point` is activated and returned.
pub fn activate_on_click(tree: &mut MenuTree, node: NodeId, point: Vec2) -> Option<NodeId> {
    let hit = tree.node(node).is_some_and(|n| hit_test::contains(n, point));
    if hit {
        if let Some(n) = tree.node_mut(node) {
            n.set_active(true);
        }
        debug!(?node, "node activated");
        return Some(node);
    }

    if !is_open(tree, node) {
        return None;
    }

    let children: Vec<NodeId> = tree.children(node).collect();
    for (i, child) in children.iter().enumerate() {
        if let Some(activated) = activate_on_click(tree, *child, point) {
            for (j, sibling) in children.iter().enumerate() {
                if j != i {
                    close(tree, *sibling);
                }
            }
            return Some(activated);
        }
    }
    None
}

/// Clear the active flag of `node` and of every internal node below it.
/// Leaves keep their flag; it carries no expansion state.
pub fn deactivate_all(tree: &mut MenuTree, node: NodeId) {
    if !tree.has_children(node) {
        return;
    }
    if let Some(n) = tree.node_mut(node) {
        n.set_active(false);
    }
    let children: Vec<NodeId> = tree.children(node).collect();
    for child in children {
        deactivate_all(tree, child);
    }
}

/// Deactivate `node` itself, leaf or not. Its subtree is left as it is.
fn close(tree: &mut MenuTree, node: NodeId) {
    if let Some(n) = tree.node_mut(node) {
        n.set_active(false);
    }
}

/// Deepest ring reached by following open nodes from `node`, which sits at
/// `depth`.
pub fn count_active_levels(tree: &MenuTree, node: NodeId, depth: usize) -> usize {
    if !is_open(tree, node) {
        return depth;
    }
    tree.children(node)
        .map(|child| count_active_levels(tree, child, depth + 1))
        .max()
        .unwrap_or(depth)
}

/// True if `point` falls in one of the currently open ring bands.
pub fn is_point_inside_active_menu(tree: &MenuTree, layout: &RingLayout, point: Vec2) -> bool {
    let levels = count_active_levels(tree, tree.root(), 0);
    (0..=levels).any(|depth| hit_test::is_point_inside_ring(layout.origin, point, depth, layout.ring_width))
}

/// Root followed by successively active children.
pub fn active_path(tree: &MenuTree) -> Vec<NodeId> {
    let mut path = vec![tree.root()];
    let mut current = tree.root();
    while let Some(next) = tree
        .children(current)
        .find(|child| tree.node(*child).is_some_and(|n| n.is_active()))
    {
        path.push(next);
        current = next;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Category, ContentLeaf, MenuNode, Rgba};

    struct Fixture {
        tree: MenuTree,
        layout: RingLayout,
        a: NodeId,
        b: NodeId,
        leaf1: NodeId,
        leaf2: NodeId,
        b1: NodeId,
    }

    /// root -> {A, B}, A -> {leaf1, leaf2}, B -> {b1}
    fn fixture() -> Fixture {
        let mut root = MenuNode::new(Category::None, Rgba::WHITE);
        root.set_radius(100.0);
        let mut tree = MenuTree::new(root);
        let r = tree.root();
        let a = tree.add_child(r, MenuNode::new(Category::Drums, Rgba::WHITE).with_label("A"));
        let b = tree.add_child(r, MenuNode::new(Category::Bass, Rgba::WHITE).with_label("B"));
        let leaf = |label: &str| {
            MenuNode::leaf(label, Rgba::GREEN, ContentLeaf::new(format!("{}.wav", label), Category::Lead))
        };
        let leaf1 = tree.add_child(a, leaf("leaf1"));
        let leaf2 = tree.add_child(a, leaf("leaf2"));
        let b1 = tree.add_child(b, leaf("b1"));

        let origin = Vec2::new(500.0, 800.0);
        if let Some(n) = tree.node_mut(r) {
            n.move_to(origin);
        }
        let layout = RingLayout::new(origin, 100.0);
        layout.place(&mut tree, r, 1);

        Fixture { tree, layout, a, b, leaf1, leaf2, b1 }
    }

    fn origin_of(tree: &MenuTree, id: NodeId) -> Vec2 {
        tree.node(id).unwrap().origin()
    }

    fn active(tree: &MenuTree, id: NodeId) -> bool {
        tree.node(id).unwrap().is_active()
    }

    fn assert_single_active_child(tree: &MenuTree) {
        for id in tree.descendants(tree.root()) {
            let count = tree.children(id).filter(|c| active(tree, *c)).count();
            assert!(count <= 1, "{} active children under {:?}", count, id);
        }
    }

    #[test]
    fn test_click_activates_and_deactivates_sibling() {
        let mut f = fixture();
        let pb = origin_of(&f.tree, f.b);
        assert_eq!(dispatch_click(&mut f.tree, &f.layout, pb), ClickOutcome::Activated(f.b));
        assert!(active(&f.tree, f.b));

        let pa = origin_of(&f.tree, f.a);
        assert_eq!(dispatch_click(&mut f.tree, &f.layout, pa), ClickOutcome::Activated(f.a));
        assert!(active(&f.tree, f.a));
        assert!(!active(&f.tree, f.b));
    }

    #[test]
    fn test_leaf_click_keeps_structure() {
        let mut f = fixture();
        let pa = origin_of(&f.tree, f.a);
        dispatch_click(&mut f.tree, &f.layout, pa);

        let p1 = origin_of(&f.tree, f.leaf1);
        assert_eq!(dispatch_click(&mut f.tree, &f.layout, p1), ClickOutcome::Activated(f.leaf1));
        assert!(active(&f.tree, f.leaf1));
        assert!(active(&f.tree, f.a), "path to the leaf stays open");
        assert_eq!(f.tree.parent(f.leaf1), Some(f.a));
        assert_eq!(active_path(&f.tree), vec![f.tree.root(), f.a, f.leaf1]);

        let p2 = origin_of(&f.tree, f.leaf2);
        dispatch_click(&mut f.tree, &f.layout, p2);
        assert!(active(&f.tree, f.leaf2));
        assert!(!active(&f.tree, f.leaf1));
    }

    #[test]
    fn test_hidden_children_are_not_clickable() {
        let mut f = fixture();
        // A is closed, so leaf1 is not reachable even though its outline exists
        let p1 = origin_of(&f.tree, f.leaf1);
        assert_ne!(dispatch_click(&mut f.tree, &f.layout, p1), ClickOutcome::Activated(f.leaf1));
        assert!(!active(&f.tree, f.leaf1));
    }

    #[test]
    fn test_far_click_collapses_everything() {
        let mut f = fixture();
        let pb = origin_of(&f.tree, f.b);
        dispatch_click(&mut f.tree, &f.layout, pb);
        let pb1 = origin_of(&f.tree, f.b1);
        dispatch_click(&mut f.tree, &f.layout, pb1);
        assert!(active(&f.tree, f.b));

        // maxDepth is 2, so anything beyond 300px from the origin is outside
        let far = f.layout.origin + Vec2::new(0.0, -350.0);
        assert_eq!(dispatch_click(&mut f.tree, &f.layout, far), ClickOutcome::MissOutsideMenu);
        assert!(!active(&f.tree, f.a));
        assert!(!active(&f.tree, f.b));
        assert_eq!(active_path(&f.tree), vec![f.tree.root()]);
        assert!(active(&f.tree, f.b1), "leaves keep their flag");
    }

    #[test]
    fn test_miss_inside_open_ring_keeps_state() {
        let mut f = fixture();
        let pa = origin_of(&f.tree, f.a);
        dispatch_click(&mut f.tree, &f.layout, pa);

        // Straight up, ring 1, between the two slots at 60 and 120 degrees
        let gap = f.layout.origin + Vec2::new(0.0, -150.0);
        assert_eq!(dispatch_click(&mut f.tree, &f.layout, gap), ClickOutcome::MissInsideMenu);
        assert!(active(&f.tree, f.a));
    }

    #[test]
    fn test_count_active_levels() {
        let mut f = fixture();
        let root = f.tree.root();
        assert_eq!(count_active_levels(&f.tree, root, 0), 1);

        let pa = origin_of(&f.tree, f.a);
        dispatch_click(&mut f.tree, &f.layout, pa);
        assert_eq!(count_active_levels(&f.tree, root, 0), 2);

        // An active leaf does not open a further ring
        let p1 = origin_of(&f.tree, f.leaf1);
        dispatch_click(&mut f.tree, &f.layout, p1);
        assert_eq!(count_active_levels(&f.tree, root, 0), 2);
    }

    #[test]
    fn test_inside_active_menu_grows_with_levels() {
        let mut f = fixture();
        let ring2 = f.layout.origin + Vec2::new(0.0, -250.0);
        assert!(!is_point_inside_active_menu(&f.tree, &f.layout, ring2));

        let pa = origin_of(&f.tree, f.a);
        dispatch_click(&mut f.tree, &f.layout, pa);
        assert!(is_point_inside_active_menu(&f.tree, &f.layout, ring2));
    }

    #[test]
    fn test_deactivate_all_idempotent() {
        let mut f = fixture();
        let pa = origin_of(&f.tree, f.a);
        dispatch_click(&mut f.tree, &f.layout, pa);
        let root = f.tree.root();

        deactivate_all(&mut f.tree, root);
        let once = f.tree.clone();
        deactivate_all(&mut f.tree, root);

        for id in f.tree.descendants(root) {
            assert_eq!(f.tree.node(id), once.node(id));
            if f.tree.has_children(id) {
                assert!(!active(&f.tree, id));
            }
        }
    }

    #[test]
    fn test_single_active_child_over_click_sequences() {
        let mut f = fixture();
        let targets = [f.a, f.leaf1, f.b, f.b1, f.a, f.leaf2, f.leaf1, f.b, f.a];

        for target in targets {
            let point = origin_of(&f.tree, target);
            dispatch_click(&mut f.tree, &f.layout, point);
            assert_single_active_child(&f.tree);
        }

        // Sweep a grid across the whole menu area as well
        for gx in 0..20 {
            for gy in 0..10 {
                let point = Vec2::new(200.0 + gx as f32 * 30.0, 500.0 + gy as f32 * 30.0);
                dispatch_click(&mut f.tree, &f.layout, point);
                assert_single_active_child(&f.tree);
            }
        }
    }

    #[test]
    fn test_reopened_branch_remembers_open_child() {
        let mut f = fixture();
        let pa = origin_of(&f.tree, f.a);
        dispatch_click(&mut f.tree, &f.layout, pa);
        let p1 = origin_of(&f.tree, f.leaf1);
        dispatch_click(&mut f.tree, &f.layout, p1);

        let pb = origin_of(&f.tree, f.b);
        dispatch_click(&mut f.tree, &f.layout, pb);
        assert!(!active(&f.tree, f.a));
        assert!(active(&f.tree, f.leaf1), "closing A leaves its subtree alone");
        assert_eq!(active_path(&f.tree), vec![f.tree.root(), f.b]);

        dispatch_click(&mut f.tree, &f.layout, pa);
        assert!(!active(&f.tree, f.b));
        assert_eq!(active_path(&f.tree), vec![f.tree.root(), f.a, f.leaf1]);
    }
}
