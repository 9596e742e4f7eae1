//! Simulation systems, grouped by the per-frame phase they run in.

pub mod battle;
pub mod camera;
pub mod combat;
pub mod movement;
pub mod travel;

pub use battle::*;
pub use camera::*;
pub use combat::*;
pub use movement::*;
pub use travel::*;
