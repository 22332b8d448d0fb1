use glam::Vec2;

use crate::drag::PointerId;
use crate::geometry::CoordSpace;

/// Pointer id used for the mouse
pub const MOUSE_POINTER: PointerId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// One decoded pointer or touch sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Vec2,
    pub space: CoordSpace,
    pub pointer_id: PointerId,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Vec2, space: CoordSpace, pointer_id: PointerId) -> Self {
        Self {
            position,
            space,
            pointer_id,
            phase,
        }
    }

    /// Mouse sample in pixel space
    pub fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::new(phase, Vec2::new(x, y), CoordSpace::Pixels, MOUSE_POINTER)
    }

    /// Touch sample in normalized space
    pub fn touch(phase: PointerPhase, x: f32, y: f32, pointer_id: PointerId) -> Self {
        Self::new(phase, Vec2::new(x, y), CoordSpace::Normalized, pointer_id)
    }
}
