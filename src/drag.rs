//! Lifted copies of leaves, dragged around independently of the menu.

use glam::Vec2;
use indextree::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::MenuNode;
use crate::tree::MenuTree;

/// Identifier of a pointer or touch contact
pub type PointerId = u64;

/// Default cap on simultaneously lifted copies
pub const DEFAULT_MAX_LIFTED: usize = 32;

/// Which lifted copies follow a pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPolicy {
    /// Every copy lifted by the moving pointer follows it
    #[default]
    PerPointer,
    /// Only the earliest copy follows, whichever pointer moves
    FirstOnly,
}

/// When lifted copies leave the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePolicy {
    /// Pointer-up hands the pointer's copies back to the host
    #[default]
    OnPointerUp,
    /// Copies stay until the host drains the list
    Manual,
}

/// Independent snapshot of a leaf, positioned at the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftedCopy {
    pub node: MenuNode,
    /// Leaf the copy was taken from
    pub source: NodeId,
    /// Pointer holding the copy; `None` once that pointer went up
    pub pointer_id: Option<PointerId>,
    /// Where the pointer was when the copy was lifted
    pub grab_position: Vec2,
}

impl LiftedCopy {
    pub fn position(&self) -> Vec2 {
        self.node.origin()
    }

    pub fn is_held_by(&self, pointer_id: PointerId) -> bool {
        self.pointer_id == Some(pointer_id)
    }
}

#[derive(Debug, Clone)]
pub struct DragController {
    lifted: Vec<LiftedCopy>,
    policy: DragPolicy,
    max_lifted: usize,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(DragPolicy::default(), DEFAULT_MAX_LIFTED)
    }
}

impl DragController {
    pub fn new(policy: DragPolicy, max_lifted: usize) -> Self {
        Self {
            lifted: Vec::new(),
            policy,
            max_lifted: max_lifted.max(1),
        }
    }

    /// Snapshot `source` at `position` if it is an active leaf. Returns
    /// whether a copy was made.
    pub fn lift(&mut self, tree: &MenuTree, source: NodeId, position: Vec2, pointer_id: PointerId) -> bool {
        if tree.has_children(source) {
            return false;
        }
        let Some(node) = tree.node(source).filter(|n| n.is_active()) else {
            return false;
        };

        let mut node = node.clone();
        node.move_to(position);

        if self.lifted.len() >= self.max_lifted {
            let evicted = self.lifted.remove(0);
            debug!(source = ?evicted.source, label = evicted.node.label(), "lifted list full, evicting oldest copy");
        }

        debug!(?source, pointer_id, x = position.x, y = position.y, "leaf lifted");
        self.lifted.push(LiftedCopy {
            node,
            source,
            pointer_id: Some(pointer_id),
            grab_position: position,
        });
        true
    }

    /// Move held copies according to the drag policy. Dropped copies never
    /// move. Returns whether any copy moved.
    pub fn drag(&mut self, position: Vec2, pointer_id: PointerId) -> bool {
        match self.policy {
            DragPolicy::FirstOnly => match self.lifted.iter_mut().find(|c| c.pointer_id.is_some()) {
                Some(copy) => {
                    copy.node.move_to(position);
                    true
                }
                None => false,
            },
            DragPolicy::PerPointer => self.follow(position, pointer_id),
        }
    }

    /// Move the copies held by `pointer_id`, whatever the drag policy.
    pub fn follow(&mut self, position: Vec2, pointer_id: PointerId) -> bool {
        let mut moved = false;
        for copy in self.lifted.iter_mut().filter(|c| c.is_held_by(pointer_id)) {
            copy.node.move_to(position);
            moved = true;
        }
        moved
    }

    /// Let go of the copies held by `pointer_id` but keep them in the list.
    /// Returns how many were dropped.
    pub fn drop_held(&mut self, pointer_id: PointerId) -> usize {
        let mut dropped = 0;
        for copy in self.lifted.iter_mut().filter(|c| c.is_held_by(pointer_id)) {
            copy.pointer_id = None;
            dropped += 1;
        }
        if dropped > 0 {
            debug!(pointer_id, count = dropped, "lifted copies dropped in place");
        }
        dropped
    }

    /// Remove and return the copies held by `pointer_id`, oldest first.
    pub fn release(&mut self, pointer_id: PointerId) -> Vec<LiftedCopy> {
        let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.lifted)
            .into_iter()
            .partition(|c| c.is_held_by(pointer_id));
        self.lifted = kept;
        if !released.is_empty() {
            debug!(pointer_id, count = released.len(), "lifted copies released");
        }
        released
    }

    pub fn take_all(&mut self) -> Vec<LiftedCopy> {
        std::mem::take(&mut self.lifted)
    }

    pub fn clear(&mut self) {
        self.lifted.clear();
    }

    pub fn lifted(&self) -> &[LiftedCopy] {
        &self.lifted
    }

    pub fn len(&self) -> usize {
        self.lifted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lifted.is_empty()
    }
}
