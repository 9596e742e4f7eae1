//! Isometric projector - grid ⇄ world/screen coordinate math plus camera pan.
//!
//! World coordinates follow the source art: x grows right, y grows *down*,
//! origin at grid cell (0,0). `rendering.rs` flips the y axis once when it
//! positions the scene anchor, so everything downstream of `project` stays in
//! this one convention.

use bevy::prelude::*;

use crate::constants::{CAMERA_SCALE, TILE_H, TILE_W};

/// Diamond transform from grid cells to world pixels.
pub fn project(grid: Vec2) -> Vec2 {
    Vec2::new(
        (grid.x - grid.y) * (TILE_W / 2.0),
        (grid.x + grid.y) * (TILE_H / 2.0),
    )
}

/// Shared camera state. Scale is fixed for the session; pan is mutated only
/// by pointer/touch drag and is never clamped.
#[derive(Resource, Clone, Copy, Debug)]
pub struct Projector {
    pub scale: f32,
    pub pan: Vec2,
}

impl Default for Projector {
    fn default() -> Self {
        Self { scale: CAMERA_SCALE, pan: Vec2::ZERO }
    }
}

impl Projector {
    /// Grid cell to screen pixels (top-left origin, y down).
    pub fn to_screen(&self, grid: Vec2) -> Vec2 {
        self.world_to_screen(project(grid))
    }

    /// World pixels to screen pixels.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world * self.scale + self.pan
    }

    /// Screen pixels back to world pixels.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_round_trips_integer_cells() {
        for gx in 0..=20 {
            for gy in 0..=20 {
                let p = project(Vec2::new(gx as f32, gy as f32));
                let diff = p.x * 2.0 / TILE_W;
                let sum = p.y * 2.0 / TILE_H;
                assert_eq!(diff as i32, gx - gy);
                assert_eq!(sum as i32, gx + gy);
            }
        }
    }

    #[test]
    fn project_is_linear() {
        let a = Vec2::new(3.0, 7.0);
        let b = Vec2::new(1.5, 2.5);
        let lhs = project(a + b);
        let rhs = project(a) + project(b);
        assert!((lhs - rhs).length() < 1e-4);
    }

    #[test]
    fn to_screen_applies_scale_then_pan() {
        let proj = Projector { scale: 1.5, pan: Vec2::new(100.0, -40.0) };
        let world = project(Vec2::new(4.0, 6.0));
        let screen = proj.to_screen(Vec2::new(4.0, 6.0));
        assert_eq!(screen, world * 1.5 + Vec2::new(100.0, -40.0));
        let back = proj.screen_to_world(screen);
        assert!((back - world).length() < 1e-4);
    }
}
