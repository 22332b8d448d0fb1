use indextree::{Arena, NodeId};

use crate::error::TreeError;
use crate::node::MenuNode;

/// Menu hierarchy stored in an arena; node ids stay valid for the
/// lifetime of the tree since nodes are never removed.
#[derive(Debug, Clone)]
pub struct MenuTree {
    arena: Arena<MenuNode>,
    root: NodeId,
}

impl MenuTree {
    /// Create a new tree with a root node
    pub fn new(root: MenuNode) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(root);
        Self { arena, root }
    }

    /// Append a new node under `parent`. The child starts with the parent's
    /// radius until layout assigns its own.
    pub fn add_child(&mut self, parent: NodeId, mut node: MenuNode) -> NodeId {
        if let Some(radius) = self.node(parent).map(MenuNode::radius) {
            node.set_radius(radius);
        }
        let node_id = self.arena.new_node(node);
        parent.append(node_id, &mut self.arena);
        node_id
    }

    /// Move an existing node (and its subtree) under `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let radius = self.node(parent).map(MenuNode::radius).ok_or(TreeError::UnknownNode)?;
        if self.node(child).is_none() {
            return Err(TreeError::UnknownNode);
        }
        if parent.ancestors(&self.arena).any(|id| id == child) {
            return Err(TreeError::Cycle);
        }

        child.detach(&mut self.arena);
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|_| TreeError::Cycle)?;
        if let Some(node) = self.node_mut(child) {
            node.set_radius(radius);
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&MenuNode> {
        self.arena.get(id).map(|n| n.get())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut MenuNode> {
        self.arena.get_mut(id).map(|n| n.get_mut())
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.children(id).next().is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|n| n.parent())
    }

    /// Distance from the root (root is depth 0).
    pub fn depth_of(&self, id: NodeId) -> usize {
        id.ancestors(&self.arena).count().saturating_sub(1)
    }

    /// Every node below `id`, depth-first, including `id` itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena)
    }

    /// Number of nodes reachable from the root.
    pub fn node_count(&self) -> usize {
        self.descendants(self.root).count()
    }

    /// Longest path from `id` down to a leaf (0 for a childless node).
    pub fn max_depth(&self, id: NodeId) -> usize {
        self.children(id)
            .map(|child| 1 + self.max_depth(child))
            .max()
            .unwrap_or(0)
    }
}
