use glam::Vec2;

use crate::api::types::Viewport;

/// Read-only view of the pointer for one frame.
///
/// The tracker is the only writer; every reader (instant cursor, damped
/// follower, particle camera) gets a copy of the same snapshot, so they can
/// never disagree about where the pointer is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSnapshot {
    pub position: Vec2,
    pub viewport: Viewport,
}

impl PointerSnapshot {
    /// Pointer position over viewport size, recentred to [-0.5, 0.5].
    pub fn normalized(&self) -> Vec2 {
        if self.viewport.is_empty() {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.position.x / self.viewport.width - 0.5,
            self.position.y / self.viewport.height - 0.5,
        )
    }

    /// Target for the particle camera: normalized, with y flipped so moving
    /// the pointer up moves the camera up.
    pub fn camera_target(&self) -> Vec2 {
        let n = self.normalized();
        Vec2::new(n.x, -n.y)
    }
}

/// Latest raw pointer position, written only by the pointer-move handler.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Vec2,
    moves: u64,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.moves += 1;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Number of moves recorded so far.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn snapshot(&self, viewport: Viewport) -> PointerSnapshot {
        PointerSnapshot {
            position: self.position,
            viewport,
        }
    }
}
